//! Drawing surface used by the view tree.
//!
//! [`Canvas`] is the seam between layout and rendering: views build text and
//! emit boxes and text runs through it. [`DrawList`] is the recording
//! implementation the engine ships with.

mod draw_list;
mod font_system;
mod text;

pub use draw_list::{DrawCmd, DrawItem, DrawList};
pub use font_system::{FontId, FontLoadError, FontSystem};
pub use text::{BuiltText, PlacedGlyph, TextJustification, TextStyle};

use crate::coords::{ColorRgba, Rect, Vec2};

/// Opaque handle to a texture owned by the host renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

pub trait Canvas {
    /// Lays out `text` inside a box of `bounds` pixels.
    ///
    /// Glyph positions in the result are relative to the bottom-left of that
    /// box, already justified according to `style`.
    fn build_text(&mut self, text: &str, style: &TextStyle, bounds: Vec2) -> BuiltText;

    /// Filled (optionally textured) rectangle.
    fn draw_box(&mut self, rect: Rect, colour: ColorRgba, texture: Option<TextureId>);

    /// Draws text built by [`Canvas::build_text`] with its box at `origin`.
    fn draw_text(&mut self, text: &BuiltText, origin: Vec2, colour: ColorRgba);

    /// Restricts subsequent drawing to `rect`, intersected with the current clip.
    fn push_clip_bounds(&mut self, rect: Rect);

    fn pop_clip_bounds(&mut self);
}
