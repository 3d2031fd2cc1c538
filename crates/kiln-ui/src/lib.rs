//! Kiln UI: a unified-coordinate view hierarchy on top of `kiln-engine`.
//!
//! ```rust,ignore
//! use kiln_ui::prelude::*;
//!
//! let mut tree = ViewTree::new(Vec2::new(640.0, 480.0));
//! let root = tree.root();
//! let menu = tree.insert(root, ViewNode::new().named("menu").with_size(UnifiedVec2::relative(0.5, 1.0)))?;
//! tree.make_vertical_list(menu, VerticalList::default().with_absolute_spacing(10.0));
//! for _ in 0..3 {
//!     tree.insert(menu, ViewNode::new().with_size(UnifiedVec2::from_components(1.0, 0.0, 0.0, 40.0)));
//! }
//!
//! let mut draw_list = DrawList::new(FontSystem::new());
//! tree.layout(&mut draw_list);
//! tree.draw(&mut draw_list);
//! ```

pub mod build;
pub mod content;
pub mod event;
pub mod layout;
pub mod properties;
pub mod resources;
pub mod view;

pub mod prelude {
    pub use crate::build::{build_document, load_str, BuildError};
    pub use crate::content::{
        Button, ButtonActivated, Content, DrawContext, Image, Label, PointerContext, ProgressBar, Slider,
        SliderChanged, StretchAxis, StretchableButton, StretchableTextures,
    };
    pub use crate::event::{Event, Subscription};
    pub use crate::layout::{
        HorizontalJustification, LayoutPolicy, ScrollState, SizePolicy, VerticalJustification,
        VerticalList,
    };
    pub use crate::resources::{ResourceMap, ResourceProvider, TextureInfo};
    pub use crate::view::{ViewId, ViewNode, ViewTree};

    pub use kiln_engine::canvas::{Canvas, DrawList, FontId, FontSystem, TextJustification};
    pub use kiln_engine::config::ParamDictionary;
    pub use kiln_engine::coords::{AlignmentAnchor, ColorRgba, Rect, UnifiedVec2, Vec2};
    pub use kiln_engine::input::PointerEvent;
}
