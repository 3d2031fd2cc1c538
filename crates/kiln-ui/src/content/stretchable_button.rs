use std::any::Any;

use kiln_engine::canvas::Canvas;
use kiln_engine::config::{ConfigError, parse_colour};
use kiln_engine::coords::{ColorRgba, Vec2};
use kiln_engine::input::PointerEvent;
use state::InitCell;

use crate::event::Event;
use crate::properties::{PropertyTable, fmt_colour};

use super::button::{DEFAULT_HIGHLIGHT_COLOUR, PressTracker};
use super::{ButtonActivated, Content, DrawContext, PointerContext, StretchAxis, StretchableTextures};

/// A [`Button`](super::Button) drawn as a horizontally stretched image, so one
/// set of textures serves buttons of any width.
#[derive(Debug)]
pub struct StretchableButton {
    normal: StretchableTextures,
    highlight: StretchableTextures,
    highlight_colour: ColorRgba,
    press: PressTracker,

    pub activated: Event<ButtonActivated>,
}

impl Default for StretchableButton {
    fn default() -> Self {
        Self {
            normal: StretchableTextures::default(),
            highlight: StretchableTextures::default(),
            highlight_colour: DEFAULT_HIGHLIGHT_COLOUR,
            press: PressTracker::default(),
            activated: Event::new(),
        }
    }
}

impl StretchableButton {
    pub fn new(normal: StretchableTextures) -> Self {
        let mut button = Self::default();
        button.set_normal(normal);
        button
    }

    pub fn normal(&self) -> StretchableTextures {
        self.normal
    }

    /// Also used as the highlight set when none is given.
    pub fn set_normal(&mut self, textures: StretchableTextures) {
        self.normal = textures;
        if self.highlight.is_empty() {
            self.highlight = textures;
        }
    }

    pub fn highlight(&self) -> StretchableTextures {
        self.highlight
    }

    /// Also used as the normal set when none is given.
    pub fn set_highlight(&mut self, textures: StretchableTextures) {
        self.highlight = textures;
        if self.normal.is_empty() {
            self.normal = textures;
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

static STRETCHABLE_BUTTON_PROPERTIES: InitCell<PropertyTable<StretchableButton>> = InitCell::new();

pub(crate) fn stretchable_button_properties() -> &'static PropertyTable<StretchableButton> {
    STRETCHABLE_BUTTON_PROPERTIES.get_or_init(|| {
        PropertyTable::<StretchableButton>::new().with(
            "HighlightColour",
            |b, v| parse_colour(v).map(|c| b.set_highlight_colour(c)),
            |b| fmt_colour(b.highlight_colour),
        )
    })
}

impl Content for StretchableButton {
    fn kind(&self) -> &'static str {
        "StretchableButton"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.normal.natural_size(StretchAxis::Horizontal)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        let (textures, tint) = if self.press.is_selected() {
            (&self.highlight, self.highlight_colour)
        } else {
            (&self.normal, ColorRgba::white())
        };
        textures.draw(canvas, ctx.rect, StretchAxis::Horizontal, ctx.colour * tint);
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
        stretchable_button_properties().apply(self, key, value)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        stretchable_button_properties().describe(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
