use std::any::Any;

use kiln_engine::canvas::Canvas;
use kiln_engine::config::{ConfigError, parse_colour};
use kiln_engine::coords::{ColorRgba, Vec2};
use kiln_engine::input::{PointerEvent, PointerId};
use state::InitCell;

use crate::event::Event;
use crate::properties::{PropertyTable, fmt_colour};
use crate::resources::TextureInfo;

use super::{Content, DrawContext, PointerContext};

/// Movement, as a fraction of screen width, that cancels a press.
const DESELECT_THRESHOLD: f32 = 0.02;

pub(super) const DEFAULT_HIGHLIGHT_COLOUR: ColorRgba = ColorRgba::new(0.7, 0.7, 0.7, 1.0);

/// Payload of [`Button::activated`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ButtonActivated {
    pub pointer: PointerId,
    pub position: Vec2,
}

/// Image button that swaps to a highlight texture and tint while pressed.
///
/// A press starts inside the button; dragging further than 2% of the screen
/// width or leaving the button cancels it; releasing inside while still
/// pressed fires [`activated`](Self::activated).
#[derive(Debug)]
pub struct Button {
    normal: Option<TextureInfo>,
    highlight: Option<TextureInfo>,
    highlight_colour: ColorRgba,
    press: PressTracker,

    pub activated: Event<ButtonActivated>,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            normal: None,
            highlight: None,
            highlight_colour: DEFAULT_HIGHLIGHT_COLOUR,
            press: PressTracker::default(),
            activated: Event::new(),
        }
    }
}

impl Button {
    pub fn new(normal: TextureInfo) -> Self {
        let mut button = Self::default();
        button.set_normal_texture(Some(normal));
        button
    }

    pub fn with_highlight(mut self, highlight: TextureInfo) -> Self {
        self.set_highlight_texture(Some(highlight));
        self
    }

    pub fn normal_texture(&self) -> Option<TextureInfo> {
        self.normal
    }

    /// Also used as the highlight texture when none is set.
    pub fn set_normal_texture(&mut self, texture: Option<TextureInfo>) {
        self.normal = texture;
        if self.highlight.is_none() {
            self.highlight = texture;
        }
    }

    pub fn highlight_texture(&self) -> Option<TextureInfo> {
        self.highlight
    }

    /// Also used as the normal texture when none is set.
    pub fn set_highlight_texture(&mut self, texture: Option<TextureInfo>) {
        self.highlight = texture;
        if self.normal.is_none() {
            self.normal = texture;
        }
    }

    pub fn highlight_colour(&self) -> ColorRgba {
        self.highlight_colour
    }

    pub fn set_highlight_colour(&mut self, colour: ColorRgba) {
        self.highlight_colour = colour;
    }

    pub fn is_selected(&self) -> bool {
        self.press.is_selected()
    }
}

// ── press tracking ────────────────────────────────────────────────────────

/// Select/cancel/activate state shared by the button kinds.
#[derive(Debug, Default)]
pub(super) struct PressTracker {
    selected: bool,
    press_position: Vec2,
}

impl PressTracker {
    pub(super) fn is_selected(&self) -> bool {
        self.selected
    }

    pub(super) fn down(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if ctx.inside && !self.selected {
            self.selected = true;
            self.press_position = event.position;
        }
    }

    pub(super) fn moved(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if !self.selected {
            return;
        }
        if !ctx.inside {
            self.selected = false;
            return;
        }
        let threshold = ctx.screen_size.x * DESELECT_THRESHOLD;
        let d = event.position - self.press_position;
        if d.x.abs() >= threshold || d.y.abs() >= threshold {
            self.selected = false;
        }
    }

    /// Ends the press; `Some` when it completes an activation.
    pub(super) fn up(&mut self, ctx: &PointerContext, event: &PointerEvent) -> Option<ButtonActivated> {
        let was_selected = std::mem::take(&mut self.selected);
        (ctx.inside && was_selected).then_some(ButtonActivated {
            pointer: event.id,
            position: event.position,
        })
    }
}

static BUTTON_PROPERTIES: InitCell<PropertyTable<Button>> = InitCell::new();

pub(crate) fn button_properties() -> &'static PropertyTable<Button> {
    BUTTON_PROPERTIES.get_or_init(|| {
        PropertyTable::<Button>::new().with(
            "HighlightColour",
            |b, v| parse_colour(v).map(|c| b.set_highlight_colour(c)),
            |b| fmt_colour(b.highlight_colour),
        )
    })
}

impl Content for Button {
    fn kind(&self) -> &'static str {
        "Button"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.normal.map(|t| t.size)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        let (texture, tint) = if self.press.is_selected() {
            (self.highlight, self.highlight_colour)
        } else {
            (self.normal, ColorRgba::white())
        };
        canvas.draw_box(ctx.rect, ctx.colour * tint, texture.map(|t| t.id));
    }

    fn pointer_down(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        self.press.down(ctx, event);
    }

    fn pointer_moved(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        self.press.moved(ctx, event);
    }

    fn pointer_up(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if let Some(activation) = self.press.up(ctx, event) {
            self.activated.notify(&activation);
        }
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Option<Result<(), ConfigError>> {
        button_properties().apply(self, key, value)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        button_properties().describe(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
