use std::any::Any;

use kiln_engine::canvas::Canvas;
use kiln_engine::config::{ConfigError, parse_colour, parse_finite_f32, parse_vec2};
use kiln_engine::coords::{AlignmentAnchor, ColorRgba, Rect, UnifiedVec2, Vec2};
use state::InitCell;

use crate::properties::{PropertyTable, fmt_colour, fmt_vec2};

use super::{Content, DrawContext, StretchAxis, StretchableTextures};

/// A background with a fill that grows along one axis.
///
/// The fill is sized as a unified value against the bar: `progress` of its
/// length and `fill_thickness` (relative, pixels) across it. Horizontal bars
/// fill from the left, vertical bars from the bottom. Either texture set
/// stands in for the other when only one is given.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    direction: StretchAxis,
    progress: f32,
    background: StretchableTextures,
    fill: StretchableTextures,
    fill_colour: ColorRgba,
    /// `(relative, absolute)` thickness of the fill across the bar.
    fill_thickness: Vec2,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            direction: StretchAxis::Horizontal,
            progress: 0.0,
            background: StretchableTextures::default(),
            fill: StretchableTextures::default(),
            fill_colour: ColorRgba::white(),
            fill_thickness: Vec2::new(1.0, 0.0),
        }
    }
}

impl ProgressBar {
    pub fn new(direction: StretchAxis) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.set_progress(progress);
        self
    }

    pub fn direction(&self) -> StretchAxis {
        self.direction
    }

    pub fn set_direction(&mut self, direction: StretchAxis) {
        self.direction = direction;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }

    pub fn background(&self) -> StretchableTextures {
        self.background
    }

    pub fn set_background(&mut self, textures: StretchableTextures) {
        self.background = textures;
        if self.fill.is_empty() {
            self.fill = textures;
        }
    }

    pub fn fill(&self) -> StretchableTextures {
        self.fill
    }

    pub fn set_fill(&mut self, textures: StretchableTextures) {
        self.fill = textures;
        if self.background.is_empty() {
            self.background = textures;
        }
    }

    pub fn fill_colour(&self) -> ColorRgba {
        self.fill_colour
    }

    pub fn set_fill_colour(&mut self, colour: ColorRgba) {
        self.fill_colour = colour;
    }

    pub fn fill_thickness(&self) -> Vec2 {
        self.fill_thickness
    }

    pub fn set_fill_thickness(&mut self, relative: f32, absolute: f32) {
        self.fill_thickness = Vec2::new(relative, absolute);
    }

    /// Where the fill lands inside a bar occupying `rect`.
    pub fn fill_rect(&self, rect: Rect) -> Rect {
        let Vec2 { x: rel, y: abs } = self.fill_thickness;
        let (size, anchor) = match self.direction {
            StretchAxis::Horizontal => (
                UnifiedVec2::from_components(self.progress, rel, 0.0, abs),
                AlignmentAnchor::MiddleLeft,
            ),
            StretchAxis::Vertical => (
                UnifiedVec2::from_components(rel, self.progress, abs, 0.0),
                AlignmentAnchor::BottomCentre,
            ),
        };
        let size = size.resolve(rect.size);
        let origin = rect.anchor_point(anchor) - size.mul_elem(anchor.offset());
        Rect::from_origin_size(origin, size)
    }
}

static PROGRESS_PROPERTIES: InitCell<PropertyTable<ProgressBar>> = InitCell::new();

pub(crate) fn progress_properties() -> &'static PropertyTable<ProgressBar> {
    PROGRESS_PROPERTIES.get_or_init(|| {
        PropertyTable::<ProgressBar>::new()
            .with(
                "Progress",
                |p, v| parse_finite_f32(v).map(|x| p.set_progress(x)),
                |p| p.progress.to_string(),
            )
            .with(
                "Direction",
                |p, v| {
                    let direction = v.parse().map_err(|()| ConfigError::UnknownVariant {
                        key: "Direction".to_string(),
                        value: v.to_string(),
                    })?;
                    p.set_direction(direction);
                    Ok(())
                },
                |p| p.direction.name().to_string(),
            )
            .with(
                "FillColour",
                |p, v| parse_colour(v).map(|c| p.set_fill_colour(c)),
                |p| fmt_colour(p.fill_colour),
            )
            .with(
                "FillThickness",
                |p, v| parse_vec2(v).map(|t| p.set_fill_thickness(t.x, t.y)),
                |p| fmt_vec2(p.fill_thickness),
            )
    })
}

impl Content for ProgressBar {
    fn kind(&self) -> &'static str {
        "ProgressBar"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.background.natural_size(self.direction)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        self.background.draw(canvas, ctx.rect, self.direction, ctx.colour);
        if self.progress > 0.0 {
            let fill = self.fill_rect(ctx.rect);
            self.fill.draw(canvas, fill, self.direction, ctx.colour * self.fill_colour);
        }
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Option<Result<(), ConfigError>> {
        progress_properties().apply(self, key, value)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        progress_properties().describe(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
