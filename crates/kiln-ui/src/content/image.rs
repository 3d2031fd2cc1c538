use std::any::Any;

use kiln_engine::canvas::Canvas;
use kiln_engine::coords::Vec2;

use crate::resources::TextureInfo;

use super::{Content, DrawContext};

/// A textured rectangle. Without a texture it draws a plain box in the
/// node's colour.
#[derive(Debug, Clone, Default)]
pub struct Image {
    texture: Option<TextureInfo>,
}

impl Image {
    pub fn new(texture: TextureInfo) -> Self {
        Self { texture: Some(texture) }
    }

    pub fn texture(&self) -> Option<TextureInfo> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureInfo>) {
        self.texture = texture;
    }
}

impl Content for Image {
    fn kind(&self) -> &'static str {
        "Image"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.texture.map(|t| t.size)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        canvas.draw_box(ctx.rect, ctx.colour, self.texture.map(|t| t.id));
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        match self.texture {
            Some(t) => vec![
                ("Texture", t.id.0.to_string()),
                ("TextureSize", crate::properties::fmt_vec2(t.size)),
            ],
            None => Vec::new(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
