//! Headless layout inspector.
//!
//! ```text
//! kiln-studio <file.kiln> [width] [height]
//! ```
//!
//! Loads a view description, lays it out at the given resolution and logs
//! every node's resolved rectangle and properties. Fonts and textures named
//! in the file are resolved relative to it; missing textures get a 64x64
//! placeholder and missing fonts fall back to a system font.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use kiln_engine::canvas::{DrawCmd, DrawList, FontId, FontSystem};
use kiln_engine::coords::Vec2;
use kiln_engine::logging::{LoggingConfig, init_logging};
use kiln_markup::{Node, parse_str};
use kiln_ui::build::build_document;
use kiln_ui::properties::view_properties;
use kiln_ui::resources::{ResourceMap, ResourceProvider};
use kiln_ui::view::{ViewId, ViewTree};

const DEFAULT_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
const PLACEHOLDER_TEXTURE: Vec2 = Vec2::new(64.0, 64.0);

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Lays out a view description and logs the resolved geometry.
#[derive(Debug, Parser)]
#[command(name = "kiln-studio", version)]
struct Args {
    /// Layout file to load.
    file: PathBuf,
    /// Screen width in pixels.
    #[arg(default_value_t = DEFAULT_SIZE.x)]
    width: f32,
    /// Screen height in pixels.
    #[arg(default_value_t = DEFAULT_SIZE.y)]
    height: f32,
}

impl Args {
    fn screen(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();
    let screen = args.screen();

    let src = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc = parse_str(&src).with_context(|| format!("parsing {}", args.file.display()))?;
    let base = args.file.parent().unwrap_or(Path::new("."));

    let mut fonts = FontSystem::new();
    let mut resources = ResourceMap::new();
    register_resources(&doc.root, base, &mut fonts, &mut resources);

    let mut tree = ViewTree::new(screen);
    let screen_root = tree.root();
    let root = build_document(&mut tree, screen_root, &doc, &resources)
        .with_context(|| format!("building {}", args.file.display()))?;

    let mut draw_list = DrawList::new(fonts);
    tree.layout(&mut draw_list);
    tree.update();
    tree.draw(&mut draw_list);

    log::info!(
        "{}: {} views at {}x{}",
        args.file.display(),
        tree.descendants(root).len(),
        screen.x,
        screen.y
    );
    dump(&tree, root);
    summarize(&draw_list);
    Ok(())
}

// ── resources ─────────────────────────────────────────────────────────────

fn register_resources(node: &Node, base: &Path, fonts: &mut FontSystem, resources: &mut ResourceMap) {
    for (key, value) in node.params() {
        match key.as_str() {
            "Font" if resources.font(&value).is_none() => {
                if let Some(font) = load_font(base, &value, fonts) {
                    resources.add_font(value, font);
                }
            }
            k if k.ends_with("Texture") && resources.texture(&value).is_none() => {
                let file = base.join(&value);
                if let Err(e) = resources.add_texture_from_file(value.as_str(), &file) {
                    log::warn!("texture {}: {e}; using a placeholder", file.display());
                    resources.add_texture(value, PLACEHOLDER_TEXTURE);
                }
            }
            _ => {}
        }
    }
    for child in &node.children {
        register_resources(child, base, fonts, resources);
    }
}

fn load_font(base: &Path, path: &str, fonts: &mut FontSystem) -> Option<FontId> {
    let bytes = std::fs::read(base.join(path)).ok().or_else(|| {
        log::warn!("font {path:?} not found next to the layout; trying system fonts");
        SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok())
    })?;
    match fonts.load_font(&bytes) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("font {path:?}: {e}");
            None
        }
    }
}

// ── report ────────────────────────────────────────────────────────────────

fn dump(tree: &ViewTree, root: ViewId) {
    for id in tree.descendants(root) {
        let Some(node) = tree.get(id) else { continue };
        let indent = "  ".repeat(tree.depth(id).saturating_sub(tree.depth(root)));
        let rect = tree.absolute_rect(id);
        let kind = node.content().map(|c| c.kind()).unwrap_or("View");
        log::info!(
            "{indent}{kind} {:?} at ({}, {}) size {}x{}{}",
            node.name(),
            rect.origin.x,
            rect.origin.y,
            rect.size.x,
            rect.size.y,
            if tree.is_offscreen(id) { " [offscreen]" } else { "" },
        );
        for (key, value) in view_properties().describe(node) {
            log::debug!("{indent}  {key}: {value}");
        }
        if let Some(content) = node.content() {
            for (key, value) in content.properties() {
                log::debug!("{indent}  {key}: {value}");
            }
        }
    }
}

fn summarize(draw_list: &DrawList) {
    let (boxes, texts) = draw_list.items().iter().fold((0, 0), |(b, t), item| match item.cmd {
        DrawCmd::Box { .. } => (b + 1, t),
        DrawCmd::Text { .. } => (b, t + 1),
    });
    let clipped = draw_list.items().iter().filter(|i| i.clip_rect.is_some()).count();
    log::info!("draw list: {boxes} boxes, {texts} text runs, {clipped} clipped");
}
