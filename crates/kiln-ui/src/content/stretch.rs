use kiln_engine::canvas::Canvas;
use kiln_engine::coords::{ColorRgba, Rect, Vec2};

use crate::resources::TextureInfo;

/// Direction a stretchable image runs in.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum StretchAxis {
    /// Start cap on the left, end cap on the right.
    #[default]
    Horizontal,
    /// Start cap at the bottom, end cap at the top.
    Vertical,
}

impl StretchAxis {
    pub const fn name(self) -> &'static str {
        match self {
            StretchAxis::Horizontal => "Horizontal",
            StretchAxis::Vertical => "Vertical",
        }
    }
}

impl std::str::FromStr for StretchAxis {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(StretchAxis::Horizontal),
            "vertical" => Ok(StretchAxis::Vertical),
            _ => Err(()),
        }
    }
}

/// Three textures laid end to end along an axis.
///
/// The caps keep their aspect ratio at the rectangle's thickness and the
/// middle stretches over what is left. When the caps alone are longer than
/// the rectangle they are shrunk proportionally and the middle disappears.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StretchableTextures {
    pub start: Option<TextureInfo>,
    pub middle: Option<TextureInfo>,
    pub end: Option<TextureInfo>,
}

impl StretchableTextures {
    /// A middle section only; draws like a plain image.
    pub fn single(texture: TextureInfo) -> Self {
        Self {
            middle: Some(texture),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.middle.is_none() && self.end.is_none()
    }

    /// Caps plus middle at their texture sizes, or `None` with no textures.
    pub fn natural_size(&self, axis: StretchAxis) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let sizes = [self.start, self.middle, self.end].map(|t| t.map_or(Vec2::zero(), |t| t.size));
        let size = match axis {
            StretchAxis::Horizontal => Vec2::new(
                sizes.iter().map(|s| s.x).sum(),
                sizes.iter().map(|s| s.y).fold(0.0, f32::max),
            ),
            StretchAxis::Vertical => Vec2::new(
                sizes.iter().map(|s| s.x).fold(0.0, f32::max),
                sizes.iter().map(|s| s.y).sum(),
            ),
        };
        Some(size)
    }

    /// Start, middle and end rectangles covering `rect`.
    pub fn layout(&self, rect: Rect, axis: StretchAxis) -> [Rect; 3] {
        let (length, thickness) = match axis {
            StretchAxis::Horizontal => (rect.size.x, rect.size.y),
            StretchAxis::Vertical => (rect.size.y, rect.size.x),
        };
        let length = length.max(0.0);

        let mut start = cap_length(self.start, thickness, axis);
        let mut end = cap_length(self.end, thickness, axis);
        let caps = start + end;
        if caps > length {
            let k = length / caps;
            start *= k;
            end *= k;
        }
        let middle = length - start - end;

        let spans = [(0.0, start), (start, middle), (start + middle, end)];
        spans.map(|(offset, len)| match axis {
            StretchAxis::Horizontal => Rect::new(rect.origin.x + offset, rect.origin.y, len, thickness),
            StretchAxis::Vertical => Rect::new(rect.origin.x, rect.origin.y + offset, thickness, len),
        })
    }

    /// Draws every non-empty part. A middle without a texture draws as a
    /// plain box in `colour`.
    pub fn draw(&self, canvas: &mut dyn Canvas, rect: Rect, axis: StretchAxis, colour: ColorRgba) {
        let parts = self.layout(rect, axis);
        let textures = [self.start, self.middle, self.end];
        for (i, (part, texture)) in parts.into_iter().zip(textures).enumerate() {
            if part.is_empty() || (texture.is_none() && i != 1) {
                continue;
            }
            canvas.draw_box(part, colour, texture.map(|t| t.id));
        }
    }
}

fn cap_length(texture: Option<TextureInfo>, thickness: f32, axis: StretchAxis) -> f32 {
    let Some(t) = texture else {
        return 0.0;
    };
    let (along, across) = match axis {
        StretchAxis::Horizontal => (t.size.x, t.size.y),
        StretchAxis::Vertical => (t.size.y, t.size.x),
    };
    if across <= 0.0 {
        return 0.0;
    }
    (along * thickness / across).max(0.0)
}
