use std::any::Any;

use kiln_engine::canvas::{BuiltText, Canvas, FontId, TextJustification, TextStyle};
use kiln_engine::config::{ConfigError, parse_bool, parse_colour, parse_f32, parse_u32};
use kiln_engine::coords::{ColorRgba, Vec2};
use state::InitCell;

use crate::properties::{PropertyTable, fmt_colour};

use super::{Content, DrawContext};

const DEFAULT_FONT_SIZE: f32 = 24.0;

/// A block of text laid out inside the node's rectangle.
///
/// Text is wrapped to the node's width and justified on both axes. The
/// optional background fills the rectangle with the node's colour.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    font: Option<FontId>,
    font_size: f32,
    text_scale: f32,
    max_lines: u32,
    line_spacing: f32,
    horizontal: TextJustification,
    vertical: TextJustification,
    text_colour: ColorRgba,
    background: bool,

    /// Text built for the last draw, with the bounds and scale it was built at.
    built: Option<(Vec2, f32, BuiltText)>,
    measured: Option<Vec2>,
    warned_missing_font: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            text_scale: 1.0,
            max_lines: 0,
            line_spacing: 1.0,
            horizontal: TextJustification::Start,
            vertical: TextJustification::Centre,
            text_colour: ColorRgba::white(),
            background: true,
            built: None,
            measured: None,
            warned_missing_font: false,
        }
    }
}

impl Label {
    pub fn new(text: impl Into<String>, font: FontId) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
            ..Self::default()
        }
    }

    fn invalidate(&mut self) {
        self.built = None;
        self.measured = None;
    }

    fn style(&self, font: FontId, scale: f32) -> TextStyle {
        TextStyle {
            font,
            size: self.font_size,
            scale,
            max_lines: self.max_lines,
            line_spacing: self.line_spacing,
            horizontal: self.horizontal,
            vertical: self.vertical,
        }
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn with_background(mut self, on: bool) -> Self {
        self.background = on;
        self
    }

    pub fn with_text_scale(mut self, scale: f32) -> Self {
        self.text_scale = scale;
        self
    }

    pub fn with_text_colour(mut self, colour: ColorRgba) -> Self {
        self.text_colour = colour;
        self
    }

    pub fn with_justification(mut self, horizontal: TextJustification, vertical: TextJustification) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate();
    }

    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<FontId>) {
        self.font = font;
        self.warned_missing_font = false;
        self.invalidate();
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.invalidate();
    }

    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    pub fn set_text_scale(&mut self, scale: f32) {
        self.text_scale = scale;
        self.invalidate();
    }

    pub fn max_lines(&self) -> u32 {
        self.max_lines
    }

    pub fn set_max_lines(&mut self, lines: u32) {
        self.max_lines = lines;
        self.invalidate();
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn set_line_spacing(&mut self, spacing: f32) {
        self.line_spacing = spacing;
        self.invalidate();
    }

    pub fn horizontal_justification(&self) -> TextJustification {
        self.horizontal
    }

    pub fn set_horizontal_justification(&mut self, j: TextJustification) {
        self.horizontal = j;
        self.invalidate();
    }

    pub fn vertical_justification(&self) -> TextJustification {
        self.vertical
    }

    pub fn set_vertical_justification(&mut self, j: TextJustification) {
        self.vertical = j;
        self.invalidate();
    }

    pub fn text_colour(&self) -> ColorRgba {
        self.text_colour
    }

    pub fn set_text_colour(&mut self, colour: ColorRgba) {
        self.text_colour = colour;
    }

    pub fn background(&self) -> bool {
        self.background
    }

    pub fn set_background(&mut self, on: bool) {
        self.background = on;
    }
}

fn parse_justification(key: &str, value: &str) -> Result<TextJustification, ConfigError> {
    value.parse().map_err(|()| ConfigError::UnknownVariant {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn justification_name(j: TextJustification, horizontal: bool) -> &'static str {
    match (j, horizontal) {
        (TextJustification::Start, true) => "Left",
        (TextJustification::Start, false) => "Top",
        (TextJustification::Centre, _) => "Centre",
        (TextJustification::End, true) => "Right",
        (TextJustification::End, false) => "Bottom",
    }
}

static LABEL_PROPERTIES: InitCell<PropertyTable<Label>> = InitCell::new();

pub(crate) fn label_properties() -> &'static PropertyTable<Label> {
    LABEL_PROPERTIES.get_or_init(|| {
        PropertyTable::<Label>::new()
            .with(
                "Text",
                |l, v| {
                    l.set_text(v);
                    Ok(())
                },
                |l| l.text.clone(),
            )
            .with(
                "FontSize",
                |l, v| parse_f32(v).map(|x| l.set_font_size(x)),
                |l| l.font_size.to_string(),
            )
            .with(
                "TextScale",
                |l, v| parse_f32(v).map(|x| l.set_text_scale(x)),
                |l| l.text_scale.to_string(),
            )
            .with(
                "NumLines",
                |l, v| parse_u32(v).map(|x| l.set_max_lines(x)),
                |l| l.max_lines.to_string(),
            )
            .with(
                "LineSpacing",
                |l, v| parse_f32(v).map(|x| l.set_line_spacing(x)),
                |l| l.line_spacing.to_string(),
            )
            .with(
                "HorizontalJustification",
                |l, v| parse_justification("HorizontalJustification", v).map(|j| l.set_horizontal_justification(j)),
                |l| justification_name(l.horizontal, true).to_string(),
            )
            .with(
                "VerticalJustification",
                |l, v| parse_justification("VerticalJustification", v).map(|j| l.set_vertical_justification(j)),
                |l| justification_name(l.vertical, false).to_string(),
            )
            .with(
                "TextColour",
                |l, v| parse_colour(v).map(|c| l.set_text_colour(c)),
                |l| fmt_colour(l.text_colour),
            )
            .with(
                "EnableBackground",
                |l, v| parse_bool(v).map(|b| l.set_background(b)),
                |l| l.background.to_string(),
            )
    })
}

impl Content for Label {
    fn kind(&self) -> &'static str {
        "Label"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.measured
    }

    /// Measures at the label's own text scale, ignoring node scale.
    fn measure(&mut self, canvas: &mut dyn Canvas, bounds: Vec2) -> Vec2 {
        let Some(font) = self.font else {
            return Vec2::zero();
        };
        let size = canvas.build_text(&self.text, &self.style(font, self.text_scale), bounds).size;
        self.measured = Some(size);
        size
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        let Some(font) = self.font else {
            if !self.warned_missing_font {
                log::error!("label {:?} has no font; not drawing", self.text);
                self.warned_missing_font = true;
            }
            return;
        };

        if self.background {
            canvas.draw_box(ctx.rect, ctx.colour, None);
        }

        let bounds = ctx.rect.size;
        let scale = self.text_scale * ctx.scale.y;
        let stale = !matches!(&self.built, Some((b, s, _)) if *b == bounds && *s == scale);
        if stale {
            let text = canvas.build_text(&self.text, &self.style(font, scale), bounds);
            self.built = Some((bounds, scale, text));
        }
        if let Some((_, _, text)) = &self.built {
            canvas.draw_text(text, ctx.rect.origin, self.text_colour * ctx.colour);
        }
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Option<Result<(), ConfigError>> {
        label_properties().apply(self, key, value)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        label_properties().describe(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
