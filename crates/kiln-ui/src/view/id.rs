/// Handle to a node in a [`ViewTree`](super::ViewTree).
///
/// Generational: a handle to a removed node never resolves to a node that
/// later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ViewId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ViewId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Generation in the high bits, index in the low bits.
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}
