use bitflags::bitflags;

bitflags! {
    /// Cached values of a node that must be recomputed before the next read.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const SIZE     = 0b0_0001;
        const POSITION = 0b0_0010;
        const SCALE    = 0b0_0100;
        const COLOUR   = 0b0_1000;
        /// Content changed and must be re-measured by the next layout pass.
        const CONTENT  = 0b1_0000;
        /// Geometry changed since the last layout pass. Reads leave it set;
        /// only [`ViewTree::layout`](super::ViewTree::layout) clears it.
        const LAYOUT   = 0b10_0000;

        const GEOMETRY = Self::SIZE.bits()
            | Self::POSITION.bits()
            | Self::SCALE.bits()
            | Self::COLOUR.bits()
            | Self::LAYOUT.bits();
    }
}
