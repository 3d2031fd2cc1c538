use crate::coords::Vec2;

/// Stable identifier of a pointer for the duration of a press.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PointerId(pub u64);

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// What produced a pointer event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerInput {
    Mouse(MouseButton),
    Touch,
}

impl Default for PointerInput {
    fn default() -> Self {
        PointerInput::Mouse(MouseButton::Left)
    }
}

/// A pointer press, move, or release in screen pixels (Y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub position: Vec2,
    pub input_type: PointerInput,
}

impl PointerEvent {
    pub fn new(id: PointerId, position: Vec2, input_type: PointerInput) -> Self {
        Self { id, position, input_type }
    }

    /// Left-button mouse event at `(x, y)`.
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::new(PointerId(0), Vec2::new(x, y), PointerInput::default())
    }

    pub fn touch(id: u64, x: f32, y: f32) -> Self {
        Self::new(PointerId(id), Vec2::new(x, y), PointerInput::Touch)
    }

    pub fn at(self, position: Vec2) -> Self {
        Self { position, ..self }
    }
}
