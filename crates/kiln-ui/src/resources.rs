//! Named fonts and textures resolved while building trees from markup.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, ImageResult};
use kiln_engine::canvas::{FontId, TextureId};
use kiln_engine::coords::Vec2;

/// A texture handle with its pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub size: Vec2,
}

pub trait ResourceProvider {
    fn font(&self, path: &str) -> Option<FontId>;
    fn texture(&self, path: &str) -> Option<TextureInfo>;
}

/// In-memory [`ResourceProvider`].
///
/// Texture ids are handed out sequentially; the host renderer is expected to
/// upload the pixels under the same id. Sizes can be probed from encoded
/// image headers without decoding the pixel data.
#[derive(Debug, Default)]
pub struct ResourceMap {
    fonts: HashMap<String, FontId>,
    textures: HashMap<String, TextureInfo>,
    next_texture: u32,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(&mut self, path: impl Into<String>, font: FontId) {
        self.fonts.insert(path.into(), font);
    }

    /// Registers a texture of known size. Re-registering a path keeps its id.
    pub fn add_texture(&mut self, path: impl Into<String>, size: Vec2) -> TextureInfo {
        let path = path.into();
        let id = match self.textures.get(&path) {
            Some(existing) => existing.id,
            None => {
                let id = TextureId(self.next_texture);
                self.next_texture += 1;
                id
            }
        };
        let info = TextureInfo { id, size };
        self.textures.insert(path, info);
        info
    }

    /// Registers a texture whose size is read from encoded image bytes.
    pub fn add_texture_from_bytes(&mut self, path: impl Into<String>, bytes: &[u8]) -> ImageResult<TextureInfo> {
        let (w, h) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(self.add_texture(path, Vec2::new(w as f32, h as f32)))
    }

    /// Registers the image file at `file` under `path`, reading only its
    /// header.
    pub fn add_texture_from_file(&mut self, path: impl Into<String>, file: impl AsRef<Path>) -> ImageResult<TextureInfo> {
        let (w, h) = image::image_dimensions(file)?;
        Ok(self.add_texture(path, Vec2::new(w as f32, h as f32)))
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl ResourceProvider for ResourceMap {
    fn font(&self, path: &str) -> Option<FontId> {
        self.fonts.get(path).copied()
    }

    fn texture(&self, path: &str) -> Option<TextureInfo> {
        self.textures.get(path).copied()
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, RgbaImage};

    use super::*;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::new(w, h).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn probes_size_from_png_bytes() {
        let mut map = ResourceMap::new();
        let info = map.add_texture_from_bytes("ui/panel.png", &png(48, 16)).unwrap();
        assert_eq!(info.size, Vec2::new(48.0, 16.0));
        assert_eq!(map.texture("ui/panel.png"), Some(info));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let mut map = ResourceMap::new();
        assert!(map.add_texture_from_bytes("bad", b"not an image").is_err());
        assert_eq!(map.texture_count(), 0);
    }

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut map = ResourceMap::new();
        let a = map.add_texture("a", Vec2::new(1.0, 1.0));
        let b = map.add_texture("b", Vec2::new(2.0, 2.0));
        let a2 = map.add_texture("a", Vec2::new(3.0, 3.0));
        assert_eq!(a.id, TextureId(0));
        assert_eq!(b.id, TextureId(1));
        assert_eq!(a2.id, a.id);
        assert_eq!(map.texture("a").map(|t| t.size), Some(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut map = ResourceMap::new();
        assert!(map.add_texture_from_file("ui/none.png", "/nonexistent/none.png").is_err());
        assert!(map.texture("ui/none.png").is_none());
    }

    #[test]
    fn fonts_resolve_by_path() {
        let mut map = ResourceMap::new();
        map.add_font("fonts/body.ttf", FontId(2));
        assert_eq!(map.font("fonts/body.ttf"), Some(FontId(2)));
        assert_eq!(map.font("fonts/missing.ttf"), None);
    }
}
