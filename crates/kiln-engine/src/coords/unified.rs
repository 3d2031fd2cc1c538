use super::Vec2;

/// A 2D value expressed as a fraction of the parent plus a pixel offset.
///
/// `resolve(parent) = parent * relative + absolute`. No clamping is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UnifiedVec2 {
    pub relative: Vec2,
    pub absolute: Vec2,
}

impl UnifiedVec2 {
    #[inline]
    pub const fn new(relative: Vec2, absolute: Vec2) -> Self {
        Self { relative, absolute }
    }

    /// Builds from `(rel_x, rel_y, abs_x, abs_y)`, the order used by
    /// description files.
    #[inline]
    pub const fn from_components(rx: f32, ry: f32, ax: f32, ay: f32) -> Self {
        Self::new(Vec2::new(rx, ry), Vec2::new(ax, ay))
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::from_components(0.0, 0.0, 0.0, 0.0)
    }

    /// Purely relative value.
    #[inline]
    pub const fn relative(rx: f32, ry: f32) -> Self {
        Self::from_components(rx, ry, 0.0, 0.0)
    }

    /// Purely absolute value.
    #[inline]
    pub const fn absolute(ax: f32, ay: f32) -> Self {
        Self::from_components(0.0, 0.0, ax, ay)
    }

    #[inline]
    pub fn resolve(self, parent: Vec2) -> Vec2 {
        parent.mul_elem(self.relative) + self.absolute
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.relative.is_finite() && self.absolute.is_finite()
    }
}
