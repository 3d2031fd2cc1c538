use std::fmt;
use std::str::FromStr;

use super::Vec2;

/// One of the nine reference points on a rectangle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AlignmentAnchor {
    TopLeft,
    TopCentre,
    TopRight,
    MiddleLeft,
    #[default]
    MiddleCentre,
    MiddleRight,
    BottomLeft,
    BottomCentre,
    BottomRight,
}

impl AlignmentAnchor {
    pub const ALL: [AlignmentAnchor; 9] = [
        AlignmentAnchor::TopLeft,
        AlignmentAnchor::TopCentre,
        AlignmentAnchor::TopRight,
        AlignmentAnchor::MiddleLeft,
        AlignmentAnchor::MiddleCentre,
        AlignmentAnchor::MiddleRight,
        AlignmentAnchor::BottomLeft,
        AlignmentAnchor::BottomCentre,
        AlignmentAnchor::BottomRight,
    ];

    /// Normalized offset of the anchor within a box: x from the left edge,
    /// y from the bottom edge, both in `[0, 1]`.
    #[inline]
    pub const fn offset(self) -> Vec2 {
        match self {
            AlignmentAnchor::TopLeft => Vec2::new(0.0, 1.0),
            AlignmentAnchor::TopCentre => Vec2::new(0.5, 1.0),
            AlignmentAnchor::TopRight => Vec2::new(1.0, 1.0),
            AlignmentAnchor::MiddleLeft => Vec2::new(0.0, 0.5),
            AlignmentAnchor::MiddleCentre => Vec2::new(0.5, 0.5),
            AlignmentAnchor::MiddleRight => Vec2::new(1.0, 0.5),
            AlignmentAnchor::BottomLeft => Vec2::new(0.0, 0.0),
            AlignmentAnchor::BottomCentre => Vec2::new(0.5, 0.0),
            AlignmentAnchor::BottomRight => Vec2::new(1.0, 0.0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AlignmentAnchor::TopLeft => "TopLeft",
            AlignmentAnchor::TopCentre => "TopCentre",
            AlignmentAnchor::TopRight => "TopRight",
            AlignmentAnchor::MiddleLeft => "MiddleLeft",
            AlignmentAnchor::MiddleCentre => "MiddleCentre",
            AlignmentAnchor::MiddleRight => "MiddleRight",
            AlignmentAnchor::BottomLeft => "BottomLeft",
            AlignmentAnchor::BottomCentre => "BottomCentre",
            AlignmentAnchor::BottomRight => "BottomRight",
        }
    }
}

/// Returned when a string names no anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnchor(pub String);

impl fmt::Display for UnknownAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown alignment anchor {:?}", self.0)
    }
}

impl std::error::Error for UnknownAnchor {}

impl FromStr for AlignmentAnchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlignmentAnchor::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}

impl fmt::Display for AlignmentAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
