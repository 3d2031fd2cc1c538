//! Layout: content-driven sizing, container policies and the layout pass.
//!
//! Geometry itself is resolved lazily by the view tree. Layout only rewrites
//! unified sizes and positions:
//!
//! - a node's [`SizePolicy`] derives its unified size from its content
//!   (natural size, aspect ratio, or measured text within min/max bounds);
//! - a node's [`LayoutPolicy`] arranges or moves its children (vertical
//!   stacking, scrolling).
//!
//! [`ViewTree::layout`](crate::view::ViewTree::layout) runs both top-down.

mod list;
mod pass;
mod scroll;
mod sizing;

pub use list::{HorizontalJustification, VerticalJustification, VerticalList};
pub use scroll::{MIN_SCROLL_SPEED, SCROLL_DECAY, ScrollState};

use kiln_engine::coords::UnifiedVec2;

/// How a node's unified size is derived on each layout pass.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum SizePolicy {
    /// The unified size is left as set.
    #[default]
    Fixed,
    /// Absolute size equal to the content's natural size.
    SizeFromContent,
    /// Width from the content, height untouched.
    WidthFromContent,
    /// Height from the content, width untouched.
    HeightFromContent,
    /// Keeps the current width and derives the height from the content's
    /// aspect ratio.
    WidthMaintainingAspect,
    /// Keeps the current height and derives the width.
    HeightMaintainingAspect,
    /// Covers the target box, preserving aspect.
    FillMaintainingAspect(UnifiedVec2),
    /// Fits inside the target box, preserving aspect.
    FitMaintainingAspect(UnifiedVec2),
    /// Sized to measured content, clamped between `min` and `max`.
    Autosize { min: UnifiedVec2, max: UnifiedVec2 },
}

impl SizePolicy {
    /// True for policies that need the content's natural size.
    pub fn uses_natural_size(self) -> bool {
        !matches!(self, SizePolicy::Fixed | SizePolicy::Autosize { .. })
    }
}

/// Container behaviour composed onto a node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LayoutPolicy {
    VerticalList(VerticalList),
    Scroll(ScrollState),
}
