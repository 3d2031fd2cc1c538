//! Content strategies attached to view nodes.
//!
//! A [`ViewNode`](crate::view::ViewNode) is a bare rectangle; what it shows
//! and how it reacts to pointers comes from an optional boxed [`Content`].

mod button;
mod image;
mod label;
mod progress;
mod slider;
mod stretch;
mod stretchable_button;

pub use button::{Button, ButtonActivated};
pub use image::Image;
pub use label::Label;
pub use progress::ProgressBar;
pub use slider::{Slider, SliderChanged};
pub use stretch::{StretchAxis, StretchableTextures};
pub use stretchable_button::StretchableButton;

use std::any::Any;
use std::fmt;

use kiln_engine::canvas::Canvas;
use kiln_engine::config::ConfigError;
use kiln_engine::coords::{ColorRgba, Rect, Vec2};
use kiln_engine::input::PointerEvent;

/// Resolved geometry handed to [`Content::draw`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawContext {
    pub rect: Rect,
    /// Absolute colour of the owning node.
    pub colour: ColorRgba,
    /// Absolute scale of the owning node.
    pub scale: Vec2,
}

/// Where a pointer event landed relative to the owning node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerContext {
    pub rect: Rect,
    pub screen_size: Vec2,
    pub inside: bool,
}

pub trait Content: Any + fmt::Debug {
    /// Short type name used by tooling and logs.
    fn kind(&self) -> &'static str;

    /// Intrinsic pixel size, used by content-driven size policies.
    fn natural_size(&self) -> Option<Vec2> {
        None
    }

    /// Size of the content when laid out inside `bounds`.
    fn measure(&mut self, _canvas: &mut dyn Canvas, _bounds: Vec2) -> Vec2 {
        self.natural_size().unwrap_or_default()
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext);

    fn pointer_down(&mut self, _ctx: &PointerContext, _event: &PointerEvent) {}

    fn pointer_moved(&mut self, _ctx: &PointerContext, _event: &PointerEvent) {}

    fn pointer_up(&mut self, _ctx: &PointerContext, _event: &PointerEvent) {}

    /// Sets a parameter by key. `None` when the key is not recognised.
    fn apply_param(&mut self, _key: &str, _value: &str) -> Option<Result<(), ConfigError>> {
        None
    }

    /// Current parameter values as strings.
    fn properties(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
