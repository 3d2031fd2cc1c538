//! Builds view subtrees from parsed `.kiln` documents.
//!
//! Every markup node becomes one [`ViewNode`]. Its properties are applied
//! through the node's [`view_properties`] table first, then through its
//! content. Values that fail to parse are logged and the default is kept, so
//! a partially broken description still produces a usable tree.

use std::fmt;

use kiln_engine::config::{ParamDictionary, parse_bool, parse_unified_vec2, parse_vec2};
use kiln_engine::coords::{ColorRgba, UnifiedVec2};
use kiln_markup::{Document, Node, ParseError, parse_str};

use crate::content::{Button, Image, Label, ProgressBar, Slider, StretchAxis, StretchableButton, StretchableTextures};
use crate::layout::{SizePolicy, VerticalList};
use crate::properties::view_properties;
use crate::resources::{ResourceProvider, TextureInfo};
use crate::view::{ViewId, ViewNode, ViewTree};

// ── errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    Parse(ParseError),
    /// The node to build under is not in the tree.
    MissingParent(ViewId),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Parse(e) => write!(f, "parse error: {e}"),
            BuildError::MissingParent(id) => write!(f, "parent {id:?} is not in the tree"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Parse(e) => Some(e),
            BuildError::MissingParent(_) => None,
        }
    }
}

impl From<ParseError> for BuildError {
    fn from(e: ParseError) -> Self {
        BuildError::Parse(e)
    }
}

// ── entry points ──────────────────────────────────────────────────────────

/// Parses `src` and builds it under the tree's root.
pub fn load_str(tree: &mut ViewTree, src: &str, resources: &dyn ResourceProvider) -> Result<ViewId, BuildError> {
    let doc = parse_str(src)?;
    let root = tree.root();
    build_document(tree, root, &doc, resources)
}

/// Builds `doc` as the last child of `parent` and returns the new subtree's
/// root.
pub fn build_document(
    tree: &mut ViewTree,
    parent: ViewId,
    doc: &Document,
    resources: &dyn ResourceProvider,
) -> Result<ViewId, BuildError> {
    if !tree.contains(parent) {
        return Err(BuildError::MissingParent(parent));
    }
    let id = Builder { tree, resources }
        .build_node(parent, &doc.root)
        .ok_or(BuildError::MissingParent(parent))?;
    log::debug!("built {} views from markup", tree.descendants(id).len());
    Ok(id)
}

// ── builder ───────────────────────────────────────────────────────────────

/// Keys consumed by the builder itself rather than a property table.
const BUILDER_KEYS: &[&str] = &[
    "Font",
    "Texture",
    "NormalTexture",
    "HighlightTexture",
    "NormalStartTexture",
    "NormalEndTexture",
    "HighlightStartTexture",
    "HighlightEndTexture",
    "BackgroundTexture",
    "BackgroundStartTexture",
    "BackgroundEndTexture",
    "ProgressTexture",
    "ProgressStartTexture",
    "ProgressEndTexture",
    "BarTexture",
    "SliderTexture",
    "EnableAutosizing",
    "UnifiedMinSize",
    "UnifiedMaxSize",
    "SizeFromImage",
    "WidthFromImage",
    "HeightFromImage",
    "WidthMaintain",
    "HeightMaintain",
    "SetWidthMaintain",
    "SetHeightMaintain",
    "SetFillMaintain",
    "SetFitMaintain",
    "ScrollHorizontally",
    "ScrollVertically",
];

/// Read by [`VerticalList::from_params`]. Labels share the justification keys.
const LIST_KEYS: &[&str] = &[
    "VerticalJustification",
    "HorizontalJustification",
    "AbsoluteSpacing",
    "RelativeSpacing",
];

const LABEL_COLOUR: ColorRgba = ColorRgba::new(0.18, 0.3, 0.4, 0.6);
const LABEL_SIZE: UnifiedVec2 = UnifiedVec2::from_components(0.2, 0.05, 0.0, 0.0);
const HORIZONTAL_BAR_SIZE: UnifiedVec2 = UnifiedVec2::relative(0.8, 0.1);
const VERTICAL_BAR_SIZE: UnifiedVec2 = UnifiedVec2::relative(0.1, 0.8);

/// Post-insert behaviour a node kind asks for.
enum Container {
    None,
    Scroll,
    List(VerticalList),
}

struct Builder<'a> {
    tree: &'a mut ViewTree,
    resources: &'a dyn ResourceProvider,
}

impl Builder<'_> {
    fn build_node(&mut self, parent: ViewId, node: &Node) -> Option<ViewId> {
        let params: ParamDictionary = node.params().into_iter().collect();

        let mut view = ViewNode::new();
        let mut container = Container::None;
        match node.kind.as_str() {
            "View" => {}
            "Label" => {
                view.set_consumes_touches(false);
                view.set_colour(LABEL_COLOUR);
                view.set_unified_size(LABEL_SIZE);
                view = view.with_content(self.label(node, &params));
            }
            "Image" => {
                let mut image = Image::default();
                image.set_texture(self.texture(&params, "Texture"));
                view = view.with_content(image);
            }
            "Button" | "HighlightButton" => view = view.with_content(self.button(&params)),
            "StretchableButton" | "StretchableHighlightButton" => {
                view = view.with_content(self.stretchable_button(&params));
            }
            "ProgressBar" | "HorizontalProgressBar" | "HorizontalEndcappedProgressBar" => {
                view.set_unified_size(HORIZONTAL_BAR_SIZE);
                view = view.with_content(self.progress_bar(&params, StretchAxis::Horizontal));
            }
            "VerticalProgressBar" | "VerticalEndcappedProgressBar" => {
                view.set_unified_size(VERTICAL_BAR_SIZE);
                view = view.with_content(self.progress_bar(&params, StretchAxis::Vertical));
            }
            "Slider" | "VerticalSlider" | "VerticalSliderBar" => {
                view.set_unified_size(VERTICAL_BAR_SIZE);
                let mut slider = Slider::default();
                slider.set_bar_texture(self.texture(&params, "BarTexture"));
                slider.set_thumb_texture(self.texture(&params, "SliderTexture"));
                view = view.with_content(slider);
            }
            "ScrollView" => container = Container::Scroll,
            "VerticalList" => container = Container::List(VerticalList::from_params(&params)),
            other => log::error!("line {}: unknown view kind {other:?}, building a plain View", node.line),
        }

        self.apply_params(&mut view, &params, node);
        let autosize = self.autosize_policy(&view, &params);

        let id = self.tree.insert(parent, view)?;

        match container {
            Container::None => {}
            Container::Scroll => {
                self.tree.make_scroll_view(id);
                if let Some(on) = params.parse_or_log("ScrollHorizontally", parse_bool) {
                    self.tree.set_horizontal_scrolling(id, on);
                }
                if let Some(on) = params.parse_or_log("ScrollVertically", parse_bool) {
                    self.tree.set_vertical_scrolling(id, on);
                }
            }
            Container::List(list) => self.tree.make_vertical_list(id, list),
        }
        if let Some(policy) = autosize {
            self.tree.set_size_policy(id, policy);
        }
        self.apply_size_mode(id, &params);

        for child in &node.children {
            self.build_node(id, child);
        }
        Some(id)
    }

    fn apply_params(&self, view: &mut ViewNode, params: &ParamDictionary, node: &Node) {
        for key in view_properties().apply_all(view, params) {
            if BUILDER_KEYS.contains(&key) || (node.kind == "VerticalList" && LIST_KEYS.contains(&key)) {
                continue;
            }
            let value = params.get(key).unwrap_or_default();
            match view.content.as_deref_mut().and_then(|c| c.apply_param(key, value)) {
                Some(Ok(())) => {}
                Some(Err(e)) => log::error!("line {}: {key}: {e}", node.line),
                None => log::warn!("line {}: {} has no parameter {key:?}", node.line, node.kind),
            }
        }
    }

    fn label(&self, node: &Node, params: &ParamDictionary) -> Label {
        let mut label = Label::default();
        if let Some(text) = &node.content {
            label.set_text(text.as_str());
        }
        match params.get("Font") {
            Some(path) => {
                let font = self.resources.font(path);
                if font.is_none() {
                    log::error!("line {}: font {path:?} is not loaded", node.line);
                }
                label.set_font(font);
            }
            None => log::warn!("line {}: label has no Font", node.line),
        }
        label
    }

    fn button(&self, params: &ParamDictionary) -> Button {
        let mut button = Button::default();
        if let Some(tex) = self.texture(params, "NormalTexture") {
            button.set_normal_texture(Some(tex));
        }
        if let Some(tex) = self.texture(params, "HighlightTexture") {
            button.set_highlight_texture(Some(tex));
        }
        button
    }

    fn stretchable_button(&self, params: &ParamDictionary) -> StretchableButton {
        let mut button = StretchableButton::default();
        let normal = self.stretchable(params, "Normal");
        if !normal.is_empty() {
            button.set_normal(normal);
        }
        let highlight = self.stretchable(params, "Highlight");
        if !highlight.is_empty() {
            button.set_highlight(highlight);
        }
        button
    }

    fn progress_bar(&self, params: &ParamDictionary, direction: StretchAxis) -> ProgressBar {
        let mut bar = ProgressBar::new(direction);
        let background = self.stretchable(params, "Background");
        if !background.is_empty() {
            bar.set_background(background);
        }
        let fill = self.stretchable(params, "Progress");
        if !fill.is_empty() {
            bar.set_fill(fill);
        }
        bar
    }

    /// `{prefix}StartTexture`, `{prefix}Texture` and `{prefix}EndTexture`.
    fn stretchable(&self, params: &ParamDictionary, prefix: &str) -> StretchableTextures {
        StretchableTextures {
            start: self.texture(params, &format!("{prefix}StartTexture")),
            middle: self.texture(params, &format!("{prefix}Texture")),
            end: self.texture(params, &format!("{prefix}EndTexture")),
        }
    }

    fn texture(&self, params: &ParamDictionary, key: &str) -> Option<TextureInfo> {
        let path = params.get(key)?;
        let tex = self.resources.texture(path);
        if tex.is_none() {
            log::error!("{key}: texture {path:?} is not loaded");
        }
        tex
    }

    /// `EnableAutosizing` bounds default to the node's own unified size.
    fn autosize_policy(&self, view: &ViewNode, params: &ParamDictionary) -> Option<SizePolicy> {
        if !params.parse_or_log("EnableAutosizing", parse_bool).unwrap_or(false) {
            return None;
        }
        let size = view.unified_size();
        let min = params.parse_or_log("UnifiedMinSize", parse_unified_vec2).unwrap_or(size);
        let max = params.parse_or_log("UnifiedMaxSize", parse_unified_vec2).unwrap_or(size);
        Some(SizePolicy::Autosize { min, max })
    }

    /// Image-driven sizing flags. The last one present wins.
    fn apply_size_mode(&mut self, id: ViewId, params: &ParamDictionary) {
        let flag = |key| params.parse_or_log(key, parse_bool).unwrap_or(false);
        if flag("SizeFromImage") {
            self.tree.set_size_policy(id, SizePolicy::SizeFromContent);
        }
        if flag("WidthFromImage") {
            self.tree.set_size_policy(id, SizePolicy::WidthFromContent);
        }
        if flag("HeightFromImage") {
            self.tree.set_size_policy(id, SizePolicy::HeightFromContent);
        }
        if flag("WidthMaintain") {
            self.tree.set_size_policy(id, SizePolicy::WidthMaintainingAspect);
        }
        if flag("HeightMaintain") {
            self.tree.set_size_policy(id, SizePolicy::HeightMaintainingAspect);
        }
        if let Some(w) = params.parse_or_log("SetWidthMaintain", parse_vec2) {
            self.tree.set_width_maintaining_aspect(id, w.x, w.y);
        }
        if let Some(h) = params.parse_or_log("SetHeightMaintain", parse_vec2) {
            self.tree.set_height_maintaining_aspect(id, h.x, h.y);
        }
        if let Some(target) = params.parse_or_log("SetFillMaintain", parse_unified_vec2) {
            self.tree.set_fill_maintaining_aspect(id, target);
        }
        if let Some(target) = params.parse_or_log("SetFitMaintain", parse_unified_vec2) {
            self.tree.set_fit_maintaining_aspect(id, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_engine::canvas::FontId;
    use kiln_engine::coords::{AlignmentAnchor, Vec2};
    use kiln_engine::input::PointerEvent;

    use super::*;
    use crate::content::testing::FakeCanvas;
    use crate::layout::{HorizontalJustification, LayoutPolicy, VerticalJustification};
    use crate::resources::ResourceMap;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn resources() -> ResourceMap {
        let mut map = ResourceMap::new();
        map.add_font("fonts/body.ttf", FontId(0));
        map.add_texture("art/logo.png", Vec2::new(64.0, 32.0));
        map.add_texture("art/button.png", Vec2::new(100.0, 40.0));
        map.add_texture("art/button_down.png", Vec2::new(100.0, 40.0));
        map.add_texture("art/track.png", Vec2::new(200.0, 20.0));
        map.add_texture("art/cap.png", Vec2::new(10.0, 20.0));
        map.add_texture("art/thumb.png", Vec2::new(30.0, 30.0));
        map
    }

    #[test]
    fn parse_errors_surface() {
        let mut t = ViewTree::new(SCREEN);
        let err = load_str(&mut t, "View {", &resources()).unwrap_err();
        assert!(matches!(err, BuildError::Parse(_)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn view_properties_are_applied() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(
            &mut t,
            r#"View {
                Name: "panel"
                UnifiedSize: (0.5, 0.25, 10, 0)
                LocalAlignment: TopLeft
                Colour: #ff000080
                ClipSubviews: true
            }"#,
            &resources(),
        )
        .unwrap();

        let node = t.get(id).unwrap();
        assert_eq!(t.find("panel"), Some(id));
        assert_eq!(node.unified_size(), UnifiedVec2::from_components(0.5, 0.25, 10.0, 0.0));
        assert_eq!(node.local_alignment(), AlignmentAnchor::TopLeft);
        assert!(node.clip_subviews());
        assert_eq!(t.absolute_size(id), Vec2::new(410.0, 150.0));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(&mut t, "View { Visible: perhaps  LocalAlignment: Sideways }", &resources()).unwrap();
        let node = t.get(id).unwrap();
        assert!(node.is_visible());
        assert_eq!(node.local_alignment(), AlignmentAnchor::MiddleCentre);
    }

    #[test]
    fn unknown_kind_builds_a_plain_view() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(&mut t, "Spinner { Name: s }", &resources()).unwrap();
        assert!(t.get(id).unwrap().content().is_none());
        assert_eq!(t.find("s"), Some(id));
    }

    #[test]
    fn label_defaults_and_params() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(
            &mut t,
            r#"Label "Hello there" { Font: "fonts/body.ttf"  FontSize: 18  TextColour: #00ff00ff }"#,
            &resources(),
        )
        .unwrap();

        let node = t.get(id).unwrap();
        assert!(!node.consumes_touches());
        assert_eq!(node.colour(), LABEL_COLOUR);
        assert_eq!(node.unified_size(), LABEL_SIZE);

        let label = t.content::<Label>(id).unwrap();
        assert_eq!(label.text(), "Hello there");
        assert_eq!(label.font(), Some(FontId(0)));
        assert_eq!(label.font_size(), 18.0);
        assert_eq!(label.text_colour(), ColorRgba::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn missing_font_still_builds_the_label() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(&mut t, r#"Label "x" { Font: "fonts/nope.ttf" }"#, &resources()).unwrap();
        assert_eq!(t.content::<Label>(id).unwrap().font(), None);
    }

    #[test]
    fn autosizing_label_uses_size_bounds() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = load_str(
            &mut t,
            r#"Label "abcd" {
                Font: "fonts/body.ttf"
                EnableAutosizing: true
                UnifiedMinSize: (0, 0, 10, 10)
                UnifiedMaxSize: (0, 0, 200, 100)
            }"#,
            &resources(),
        )
        .unwrap();

        assert_eq!(
            t.get(id).unwrap().size_policy(),
            SizePolicy::Autosize {
                min: UnifiedVec2::absolute(10.0, 10.0),
                max: UnifiedVec2::absolute(200.0, 100.0),
            }
        );
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn image_sizes_from_texture() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(&mut t, r#"Image { Texture: "art/logo.png"  SizeFromImage: true }"#, &resources()).unwrap();
        assert_eq!(t.absolute_size(id), Vec2::new(64.0, 32.0));

        let id = load_str(
            &mut t,
            r#"Image { Texture: "art/logo.png"  SetWidthMaintain: (0, 100) }"#,
            &resources(),
        )
        .unwrap();
        assert_eq!(t.absolute_size(id), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn button_textures_resolve() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(
            &mut t,
            r#"HighlightButton {
                NormalTexture: "art/button.png"
                HighlightTexture: "art/button_down.png"
                HighlightColour: (1, 1, 0, 1)
            }"#,
            &resources(),
        )
        .unwrap();
        let res = resources();
        let button = t.content::<Button>(id).unwrap();
        assert_eq!(button.normal_texture(), res.texture("art/button.png"));
        assert_eq!(button.highlight_texture(), res.texture("art/button_down.png"));
        assert_eq!(button.highlight_colour(), ColorRgba::new(1.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn scroll_view_children_land_in_content() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(
            &mut t,
            r#"ScrollView {
                UnifiedSize: (0, 0, 200, 100)
                ScrollHorizontally: false
                View { Name: "row" }
            }"#,
            &resources(),
        )
        .unwrap();

        let content = t.scroll_state(id).unwrap().content();
        assert_eq!(t.parent(t.find("row").unwrap()), Some(content));
        assert!(!t.is_horizontal_scrolling_enabled(id));
        assert!(t.is_vertical_scrolling_enabled(id));
    }

    #[test]
    fn markup_list_lays_out_like_code() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = load_str(
            &mut t,
            r#"VerticalList {
                UnifiedSize: (0, 0, 100, 300)
                AbsoluteSpacing: 10
                VerticalJustification: Top
                HorizontalJustification: Left
                View { UnifiedSize: (1, 0, 0, 40) }
                View { UnifiedSize: (1, 0, 0, 40) }
                View { UnifiedSize: (1, 0, 0, 40) }
            }"#,
            &resources(),
        )
        .unwrap();

        assert!(matches!(
            t.get(id).unwrap().layout_policy(),
            Some(LayoutPolicy::VerticalList(l))
                if l.vertical == VerticalJustification::Top && l.horizontal == HorizontalJustification::Left
        ));
        t.layout(&mut canvas);
        let offsets: Vec<f32> = t
            .children(id)
            .iter()
            .map(|c| t.get(*c).unwrap().unified_position().absolute.y)
            .collect();
        assert_eq!(offsets, vec![0.0, -50.0, -100.0]);
    }

    #[test]
    fn properties_round_trip_through_markup() {
        let mut t = ViewTree::new(SCREEN);
        let id = load_str(
            &mut t,
            r#"View {
                Name: "a"
                UnifiedPosition: (0.1, 0.2, 3, 4)
                Scale: (2, 2)
                Visible: false
            }"#,
            &resources(),
        )
        .unwrap();

        let described: ParamDictionary = view_properties()
            .describe(t.get(id).unwrap())
            .into_iter()
            .collect();
        let mut copy = ViewTree::new(SCREEN);
        let src = format!(
            "View {{ Name: {}  UnifiedPosition: ({})  Scale: ({})  Visible: {} }}",
            described.get("Name").unwrap(),
            described.get("UnifiedPosition").unwrap(),
            described.get("Scale").unwrap(),
            described.get("Visible").unwrap(),
        );
        let copied = load_str(&mut copy, &src, &resources()).unwrap();
        assert_eq!(
            view_properties().describe(copy.get(copied).unwrap()),
            view_properties().describe(t.get(id).unwrap())
        );
    }

    #[test]
    fn endcapped_progress_bar_from_markup() {
        let mut t = ViewTree::new(SCREEN);
        let res = resources();
        let id = load_str(
            &mut t,
            r#"HorizontalEndcappedProgressBar {
                BackgroundTexture: "art/track.png"
                ProgressStartTexture: "art/cap.png"
                ProgressTexture: "art/track.png"
                ProgressEndTexture: "art/cap.png"
                Progress: 0.4
                FillColour: #00ff00ff
            }"#,
            &res,
        )
        .unwrap();

        assert_eq!(t.get(id).unwrap().unified_size(), HORIZONTAL_BAR_SIZE);
        let bar = t.content::<ProgressBar>(id).unwrap();
        assert_eq!(bar.progress(), 0.4);
        assert_eq!(bar.direction(), StretchAxis::Horizontal);
        assert_eq!(bar.background(), StretchableTextures::single(res.texture("art/track.png").unwrap()));
        assert_eq!(bar.fill().start, res.texture("art/cap.png"));
        assert_eq!(bar.fill().end, res.texture("art/cap.png"));
        assert_eq!(bar.fill_colour(), ColorRgba::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn markup_slider_tracks_a_captured_drag() {
        let mut t = ViewTree::new(SCREEN);
        let res = resources();
        let id = load_str(
            &mut t,
            r#"VerticalSliderBar { BarTexture: "art/track.png"  SliderTexture: "art/thumb.png"  Value: 0.2 }"#,
            &res,
        )
        .unwrap();

        // Centred on screen: 80 x 480, spanning y 60..540.
        assert_eq!(t.absolute_size(id), Vec2::new(80.0, 480.0));
        let slider = t.content::<Slider>(id).unwrap();
        assert_eq!(slider.value(), 0.2);
        assert_eq!(slider.thumb_texture(), res.texture("art/thumb.png"));

        assert!(t.on_pointer_down(&PointerEvent::mouse(400.0, 300.0)));
        assert_eq!(t.content::<Slider>(id).unwrap().value(), 0.5);
        t.on_pointer_moved(&PointerEvent::mouse(700.0, 590.0));
        t.on_pointer_up(&PointerEvent::mouse(700.0, 590.0));
        assert_eq!(t.content::<Slider>(id).unwrap().value(), 1.0);
    }

    #[test]
    fn stretchable_button_from_markup() {
        let mut t = ViewTree::new(SCREEN);
        let res = resources();
        let id = load_str(
            &mut t,
            r#"StretchableHighlightButton {
                NormalStartTexture: "art/cap.png"
                NormalTexture: "art/button.png"
                NormalEndTexture: "art/cap.png"
                HighlightColour: (1, 1, 0, 1)
            }"#,
            &res,
        )
        .unwrap();

        let button = t.content::<StretchableButton>(id).unwrap();
        assert_eq!(button.normal().start, res.texture("art/cap.png"));
        assert_eq!(button.normal().middle, res.texture("art/button.png"));
        assert_eq!(button.highlight(), button.normal());
        assert_eq!(button.highlight_colour(), ColorRgba::new(1.0, 1.0, 0.0, 1.0));
    }
}
