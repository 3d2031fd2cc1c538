use std::str::FromStr;

use crate::coords::Vec2;

use super::FontId;

/// Placement of a text block along one axis of its box.
///
/// Horizontally `Start` is the left edge; vertically it is the top edge.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TextJustification {
    #[default]
    Start,
    Centre,
    End,
}

impl TextJustification {
    /// Fraction of the free space placed before the text.
    #[inline]
    pub const fn factor(self) -> f32 {
        match self {
            TextJustification::Start => 0.0,
            TextJustification::Centre => 0.5,
            TextJustification::End => 1.0,
        }
    }
}

impl FromStr for TextJustification {
    type Err = ();

    /// Accepts `Left|Centre|Right` and `Top|Middle|Bottom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Left" | "Top" => Ok(TextJustification::Start),
            "Centre" | "Center" | "Middle" => Ok(TextJustification::Centre),
            "Right" | "Bottom" => Ok(TextJustification::End),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    /// Pixel size at scale 1.
    pub size: f32,
    pub scale: f32,
    /// `0` means unlimited.
    pub max_lines: u32,
    /// Multiplier on the font's natural line height.
    pub line_spacing: f32,
    pub horizontal: TextJustification,
    pub vertical: TextJustification,
}

impl TextStyle {
    pub fn new(font: FontId, size: f32) -> Self {
        Self {
            font,
            size,
            scale: 1.0,
            max_lines: 0,
            line_spacing: 1.0,
            horizontal: TextJustification::Start,
            vertical: TextJustification::Start,
        }
    }

    #[inline]
    pub fn pixel_size(&self) -> f32 {
        self.size * self.scale
    }
}

/// One positioned glyph. `position` is the bottom-left of its bitmap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub position: Vec2,
    pub size: Vec2,
}

/// Text laid out against a box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltText {
    pub glyphs: Vec<PlacedGlyph>,
    /// Extent of the laid-out text (not the box).
    pub size: Vec2,
    pub lines: usize,
}

impl BuiltText {
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
