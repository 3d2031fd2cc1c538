use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle as GlyphRun};

use crate::coords::Vec2;

use super::{BuiltText, PlacedGlyph, TextStyle};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub usize);

/// Owns the loaded fonts and lays text out with `fontdue`.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl fmt::Debug for FontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSystem").field("fonts", &self.fonts.len()).finish()
    }
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays `text` out inside `bounds`.
    ///
    /// A non-finite or non-positive bound disables wrapping (width) or
    /// justification (height) on that axis. `style.max_lines` truncates after
    /// wrapping.
    pub fn build_text(&self, text: &str, style: &TextStyle, bounds: Vec2) -> BuiltText {
        let Some(font) = self.get(style.font) else {
            log::warn!("build_text: unknown font {:?}", style.font);
            return BuiltText::default();
        };

        let px = style.pixel_size();
        if text.is_empty() || !(px > 0.0) {
            return BuiltText::default();
        }

        let bounded = |v: f32| (v.is_finite() && v > 0.0).then_some(v);
        let box_w = bounded(bounds.x);
        let box_h = bounded(bounds.y);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            max_width: box_w,
            line_height: style.line_spacing.max(0.0),
            ..LayoutSettings::default()
        });
        layout.append(&[font], &GlyphRun::new(text, px, 0));

        let lines = layout.lines().map(Vec::as_slice).unwrap_or(&[]);
        let kept = match style.max_lines {
            0 => lines.len(),
            n => lines.len().min(n as usize),
        };
        let Some(last) = kept.checked_sub(1).and_then(|i| lines.get(i)) else {
            return BuiltText::default();
        };

        let all = layout.glyphs();

        // Pen extent after each glyph, not the bitmap edge, so re-laying out
        // at the measured width does not wrap.
        let advance_extent = |start: usize, end: usize| {
            all[start..=end.min(all.len().saturating_sub(1))]
                .iter()
                .map(|g| {
                    let m = font.metrics_indexed(g.key.glyph_index, px);
                    (g.x - m.xmin as f32 + m.advance_width).max(0.0)
                })
                .fold(0.0f32, f32::max)
        };

        let line_widths: Vec<f32> = lines[..kept]
            .iter()
            .map(|l| if all.is_empty() { 0.0 } else { advance_extent(l.glyph_start, l.glyph_end) })
            .collect();

        let width = line_widths.iter().copied().fold(0.0f32, f32::max);
        let height = last.baseline_y - last.min_descent;

        let top = box_h.unwrap_or(height);
        let dy = box_h.map_or(0.0, |h| (h - height) * style.vertical.factor());

        let mut glyphs = Vec::new();
        for (line, line_w) in lines[..kept].iter().zip(&line_widths) {
            let dx = box_w.map_or(0.0, |w| (w - line_w) * style.horizontal.factor());
            let end = (line.glyph_end + 1).min(all.len());
            for g in &all[line.glyph_start.min(end)..end] {
                if g.width == 0 || g.height == 0 {
                    continue;
                }
                glyphs.push(PlacedGlyph {
                    ch: g.parent,
                    position: Vec2::new(g.x + dx, top - dy - (g.y + g.height as f32)),
                    size: Vec2::new(g.width as f32, g.height as f32),
                });
            }
        }

        BuiltText {
            glyphs,
            size: Vec2::new(width, height),
            lines: kept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_builds_nothing() {
        let fonts = FontSystem::new();
        let built = fonts.build_text("hello", &TextStyle::new(FontId(3), 16.0), Vec2::new(100.0, 20.0));
        assert!(built.is_empty());
        assert_eq!(built.size, Vec2::zero());
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert_eq!(fonts.font_count(), 0);
    }
}
