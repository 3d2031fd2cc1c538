//! Coordinate and geometry types shared across the engine and UI.
//!
//! Canonical screen space:
//! - Pixels
//! - Origin bottom-left
//! - +X right, +Y up
//!
//! A `Rect` stores its bottom-left (minimum) corner as `origin`.

mod anchor;
mod color;
mod rect;
mod unified;
mod vec2;
mod vec3;

pub use anchor::AlignmentAnchor;
pub use color::ColorRgba;
pub use rect::Rect;
pub use unified::UnifiedVec2;
pub use vec2::Vec2;
pub use vec3::Vec3;
