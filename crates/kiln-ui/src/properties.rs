//! Reflection tables mapping parameter keys to typed setters and getters.
//!
//! Each configurable type owns one [`PropertyTable`], built lazily in a
//! `static` [`state::InitCell`]. Tree building feeds markup parameters
//! through these tables, and tooling uses [`PropertyTable::describe`] to dump
//! a node's current values.

use kiln_engine::config::{
    ConfigError, ParamDictionary, parse_anchor, parse_bool, parse_colour, parse_unified_vec2,
    parse_vec2,
};
use kiln_engine::coords::{ColorRgba, UnifiedVec2, Vec2};
use state::InitCell;

use crate::view::ViewNode;

pub type Setter<T> = fn(&mut T, &str) -> Result<(), ConfigError>;
pub type Getter<T> = fn(&T) -> String;

pub struct Property<T> {
    pub name: &'static str,
    set: Setter<T>,
    get: Getter<T>,
}

impl<T> Property<T> {
    pub fn set(&self, target: &mut T, value: &str) -> Result<(), ConfigError> {
        (self.set)(target, value)
    }

    pub fn get(&self, target: &T) -> String {
        (self.get)(target)
    }
}

pub struct PropertyTable<T> {
    props: Vec<Property<T>>,
}

impl<T> Default for PropertyTable<T> {
    fn default() -> Self {
        Self { props: Vec::new() }
    }
}

impl<T> PropertyTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, set: Setter<T>, get: Getter<T>) -> Self {
        debug_assert!(self.get(name).is_none(), "duplicate property {name}");
        self.props.push(Property { name, set, get });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Property<T>> {
        self.props.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.props.iter().map(|p| p.name)
    }

    /// `None` when the key is not in the table.
    pub fn apply(&self, target: &mut T, key: &str, value: &str) -> Option<Result<(), ConfigError>> {
        self.get(key).map(|p| p.set(target, value))
    }

    /// Applies every known key of `params`, logging values that fail to parse.
    /// Returns the keys the table does not know.
    pub fn apply_all<'a>(&self, target: &mut T, params: &'a ParamDictionary) -> Vec<&'a str> {
        let mut unknown = Vec::new();
        for (key, value) in params.iter() {
            match self.apply(target, key, value) {
                Some(Ok(())) => {}
                Some(Err(e)) => log::error!("{key}: {e}"),
                None => unknown.push(key),
            }
        }
        unknown
    }

    pub fn describe(&self, target: &T) -> Vec<(&'static str, String)> {
        self.props.iter().map(|p| (p.name, p.get(target))).collect()
    }
}

// ── formatting ────────────────────────────────────────────────────────────

pub(crate) fn fmt_vec2(v: Vec2) -> String {
    format!("{}, {}", v.x, v.y)
}

pub(crate) fn fmt_unified(u: UnifiedVec2) -> String {
    format!("{}, {}, {}, {}", u.relative.x, u.relative.y, u.absolute.x, u.absolute.y)
}

pub(crate) fn fmt_colour(c: ColorRgba) -> String {
    format!("{}, {}, {}, {}", c.r, c.g, c.b, c.a)
}

// ── view node ─────────────────────────────────────────────────────────────

static VIEW_PROPERTIES: InitCell<PropertyTable<ViewNode>> = InitCell::new();

pub fn view_properties() -> &'static PropertyTable<ViewNode> {
    VIEW_PROPERTIES.get_or_init(|| {
        PropertyTable::<ViewNode>::new()
            .with(
                "Name",
                |n, v| {
                    n.set_name(v);
                    Ok(())
                },
                |n| n.name().to_string(),
            )
            .with(
                "UnifiedSize",
                |n, v| parse_unified_vec2(v).map(|x| n.set_unified_size(x)),
                |n| fmt_unified(n.unified_size()),
            )
            .with(
                "UnifiedPosition",
                |n, v| parse_unified_vec2(v).map(|x| n.set_unified_position(x)),
                |n| fmt_unified(n.unified_position()),
            )
            .with(
                "LocalAlignment",
                |n, v| parse_anchor(v).map(|x| n.set_local_alignment(x)),
                |n| n.local_alignment().to_string(),
            )
            .with(
                "ParentalAlignment",
                |n, v| parse_anchor(v).map(|x| n.set_parent_alignment(x)),
                |n| n.parent_alignment().to_string(),
            )
            .with(
                "AlignToParent",
                |n, v| parse_bool(v).map(|x| n.set_align_to_parent(x)),
                |n| n.align_to_parent().to_string(),
            )
            .with(
                "Visible",
                |n, v| parse_bool(v).map(|x| n.set_visible(x)),
                |n| n.is_visible().to_string(),
            )
            .with(
                "UserInteraction",
                |n, v| parse_bool(v).map(|x| n.set_user_interaction(x)),
                |n| n.user_interaction().to_string(),
            )
            .with(
                "ConsumesTouches",
                |n, v| parse_bool(v).map(|x| n.set_consumes_touches(x)),
                |n| n.consumes_touches().to_string(),
            )
            .with(
                "ClipSubviews",
                |n, v| parse_bool(v).map(|x| n.set_clip_subviews(x)),
                |n| n.clip_subviews().to_string(),
            )
            .with(
                "ClipOffscreen",
                |n, v| parse_bool(v).map(|x| n.set_clip_offscreen(x)),
                |n| n.clip_offscreen().to_string(),
            )
            .with(
                "Scale",
                |n, v| parse_vec2(v).map(|x| n.set_scale(x)),
                |n| fmt_vec2(n.scale()),
            )
            .with(
                "Colour",
                |n, v| parse_colour(v).map(|x| n.set_colour(x)),
                |n| fmt_colour(n.colour()),
            )
            .with(
                "InheritColour",
                |n, v| parse_bool(v).map(|x| n.set_inherit_colour(x)),
                |n| n.inherit_colour().to_string(),
            )
    })
}

#[cfg(test)]
mod tests {
    use kiln_engine::coords::AlignmentAnchor;

    use super::*;

    #[test]
    fn view_table_sets_and_reads_back() {
        let table = view_properties();
        let mut node = ViewNode::new();

        assert_eq!(table.apply(&mut node, "UnifiedSize", "1, 0, 0, 40"), Some(Ok(())));
        assert_eq!(node.unified_size(), UnifiedVec2::from_components(1.0, 0.0, 0.0, 40.0));
        assert_eq!(table.get("UnifiedSize").unwrap().get(&node), "1, 0, 0, 40");

        table.apply(&mut node, "LocalAlignment", "TopLeft").unwrap().unwrap();
        assert_eq!(node.local_alignment(), AlignmentAnchor::TopLeft);
    }

    #[test]
    fn unknown_key_is_none() {
        let mut node = ViewNode::new();
        assert!(view_properties().apply(&mut node, "Nope", "1").is_none());
    }

    #[test]
    fn bad_value_is_reported_and_leaves_node_untouched() {
        let mut node = ViewNode::new();
        let res = view_properties().apply(&mut node, "Visible", "perhaps");
        assert!(matches!(res, Some(Err(ConfigError::InvalidBool(_)))));
        assert!(node.is_visible());
    }

    #[test]
    fn apply_all_collects_unknown_keys() {
        let mut node = ViewNode::new();
        let params = ParamDictionary::new()
            .with("Name", "panel")
            .with("Scale", "2, 2")
            .with("Text", "hello");
        let unknown = view_properties().apply_all(&mut node, &params);

        assert_eq!(unknown, vec!["Text"]);
        assert_eq!(node.name(), "panel");
        assert_eq!(node.scale(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn describe_lists_every_property() {
        let node = ViewNode::new();
        let described = view_properties().describe(&node);
        assert_eq!(described.len(), view_properties().names().count());
        assert!(described.contains(&("Visible", "true".to_string())));
    }
}
