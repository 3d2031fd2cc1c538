use crate::coords::{ColorRgba, Rect, Vec2};

use super::{BuiltText, Canvas, FontSystem, TextStyle, TextureId};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Box {
        rect: Rect,
        colour: ColorRgba,
        texture: Option<TextureId>,
    },
    Text {
        text: BuiltText,
        origin: Vec2,
        colour: ColorRgba,
    },
}

/// A recorded command with the clip in effect when it was pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// `None` = unclipped.
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for one frame, in paint order.
///
/// Owns the [`FontSystem`] so it can build text for the views that draw
/// into it.
#[derive(Debug, Default)]
pub struct DrawList {
    fonts: FontSystem,
    items: Vec<DrawItem>,

    /// Top is the effective clip, already intersected with every parent.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    pub fn new(fonts: FontSystem) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontSystem {
        &mut self.fonts
    }

    /// Clears recorded items and the clip stack, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.clip_stack.clear();
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    fn push(&mut self, cmd: DrawCmd) {
        // Fully clipped away: nothing would reach the screen.
        if self.current_clip().is_some_and(Rect::is_empty) {
            return;
        }
        self.items.push(DrawItem {
            cmd,
            clip_rect: self.current_clip(),
        });
    }
}

impl Canvas for DrawList {
    fn build_text(&mut self, text: &str, style: &TextStyle, bounds: Vec2) -> BuiltText {
        self.fonts.build_text(text, style, bounds)
    }

    fn draw_box(&mut self, rect: Rect, colour: ColorRgba, texture: Option<TextureId>) {
        self.push(DrawCmd::Box { rect, colour, texture });
    }

    fn draw_text(&mut self, text: &BuiltText, origin: Vec2, colour: ColorRgba) {
        if text.is_empty() {
            return;
        }
        self.push(DrawCmd::Text {
            text: text.clone(),
            origin,
            colour,
        });
    }

    fn push_clip_bounds(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect.normalized(),
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    fn pop_clip_bounds(&mut self) {
        if self.clip_stack.pop().is_none() {
            log::warn!("pop_clip_bounds without matching push_clip_bounds");
        }
    }
}
