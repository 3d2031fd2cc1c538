use std::str::FromStr;

use kiln_engine::config::{ParamDictionary, parse_f32};
use kiln_engine::coords::{AlignmentAnchor, UnifiedVec2};

use crate::view::{ViewId, ViewTree};

use super::LayoutPolicy;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum VerticalJustification {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl FromStr for VerticalJustification {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Top" => Ok(Self::Top),
            "Middle" => Ok(Self::Middle),
            "Bottom" => Ok(Self::Bottom),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum HorizontalJustification {
    Left,
    #[default]
    Centre,
    Right,
}

impl HorizontalJustification {
    /// Anchor used for both the child's local and parent alignment.
    pub fn anchor(self) -> AlignmentAnchor {
        match self {
            Self::Left => AlignmentAnchor::TopLeft,
            Self::Centre => AlignmentAnchor::TopCentre,
            Self::Right => AlignmentAnchor::TopRight,
        }
    }
}

impl FromStr for HorizontalJustification {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Left" => Ok(Self::Left),
            "Centre" | "Center" => Ok(Self::Centre),
            "Right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

/// Stacks children top to bottom in insertion order.
///
/// Spacing between children is `container_height * relative_spacing +
/// absolute_spacing`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VerticalList {
    pub vertical: VerticalJustification,
    pub horizontal: HorizontalJustification,
    pub absolute_spacing: f32,
    pub relative_spacing: f32,
}

impl VerticalList {
    pub fn with_absolute_spacing(mut self, spacing: f32) -> Self {
        self.absolute_spacing = spacing;
        self
    }

    pub fn with_relative_spacing(mut self, spacing: f32) -> Self {
        self.relative_spacing = spacing;
        self
    }

    pub fn with_justification(mut self, vertical: VerticalJustification, horizontal: HorizontalJustification) -> Self {
        self.vertical = vertical;
        self.horizontal = horizontal;
        self
    }

    /// Reads `VerticalJustification`, `HorizontalJustification`,
    /// `AbsoluteSpacing` and `RelativeSpacing`. Bad values are logged and the
    /// default kept.
    pub fn from_params(params: &ParamDictionary) -> Self {
        let mut list = Self::default();
        if let Some(v) = params.get("VerticalJustification") {
            match v.parse() {
                Ok(j) => list.vertical = j,
                Err(()) => log::error!("VerticalJustification: unknown value {v:?}"),
            }
        }
        if let Some(v) = params.get("HorizontalJustification") {
            match v.parse() {
                Ok(j) => list.horizontal = j,
                Err(()) => log::error!("HorizontalJustification: unknown value {v:?}"),
            }
        }
        list.absolute_spacing = params.parse_or_log("AbsoluteSpacing", parse_f32).unwrap_or(0.0);
        list.relative_spacing = params.parse_or_log("RelativeSpacing", parse_f32).unwrap_or(0.0);
        list
    }
}

impl ViewTree {
    /// Makes `id` stack its children. Replaces any scroll behaviour.
    pub fn make_vertical_list(&mut self, id: ViewId, list: VerticalList) {
        if let Some(node) = self.node_mut(id) {
            node.layout_policy = Some(LayoutPolicy::VerticalList(list));
        }
    }

    pub fn vertical_list(&self, id: ViewId) -> Option<&VerticalList> {
        match self.get(id)?.layout_policy()? {
            LayoutPolicy::VerticalList(list) => Some(list),
            _ => None,
        }
    }

    /// Positions the children of `id` according to `list`.
    pub(crate) fn arrange_vertical_list(&mut self, id: ViewId, list: VerticalList) {
        let height = self.absolute_size(id).y;
        let spacing = height * list.relative_spacing + list.absolute_spacing;
        let anchor = list.horizontal.anchor();
        let children = self.children(id).to_vec();

        let mut y = 0.0;
        let mut offsets = Vec::with_capacity(children.len());
        for &child in &children {
            let aligned = self.get(child).is_some_and(|n| {
                n.align_to_parent() && n.parent_alignment() == anchor && n.local_alignment() == anchor
            });
            if !aligned {
                if let Some(node) = self.node_mut(child) {
                    node.set_align_to_parent(true);
                    node.set_parent_alignment(anchor);
                    node.set_local_alignment(anchor);
                }
            }
            offsets.push(y);
            y -= self.absolute_size(child).y + spacing;
        }
        if !children.is_empty() {
            y += spacing;
        }

        // `y` is now minus the stacked height.
        let shift = match list.vertical {
            VerticalJustification::Top => 0.0,
            VerticalJustification::Bottom => -(height + y),
            VerticalJustification::Middle => (height + y) * -0.5,
        };
        for (child, offset) in children.into_iter().zip(offsets) {
            self.set_unified_position(child, UnifiedVec2::absolute(0.0, offset + shift));
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_engine::coords::Vec2;

    use super::*;
    use crate::content::testing::FakeCanvas;
    use crate::view::ViewNode;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn list_with(t: &mut ViewTree, list: VerticalList, heights: &[f32]) -> (ViewId, Vec<ViewId>) {
        let container = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(100.0, 300.0)))
            .unwrap();
        t.make_vertical_list(container, list);
        let children = heights
            .iter()
            .map(|h| {
                t.insert(container, ViewNode::new().with_size(UnifiedVec2::from_components(1.0, 0.0, 0.0, *h)))
                    .unwrap()
            })
            .collect();
        (container, children)
    }

    fn offsets(t: &ViewTree, children: &[ViewId]) -> Vec<f32> {
        children
            .iter()
            .map(|c| t.get(*c).unwrap().unified_position().absolute.y)
            .collect()
    }

    #[test]
    fn three_children_top_justified() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let (container, children) = list_with(&mut t, VerticalList::default().with_absolute_spacing(10.0), &[40.0; 3]);

        t.layout(&mut canvas);
        assert_eq!(offsets(&t, &children), vec![0.0, -50.0, -100.0]);

        let top = t.absolute_rect(container).top();
        assert_eq!(t.absolute_rect(children[0]).top(), top);
        assert_eq!(t.absolute_rect(children[2]).top(), top - 100.0);
    }

    #[test]
    fn bottom_justified_last_child_is_flush() {
        for spacing in [0.0, 10.0, 7.5] {
            let mut t = ViewTree::new(SCREEN);
            let mut canvas = FakeCanvas::default();
            let list = VerticalList::default()
                .with_absolute_spacing(spacing)
                .with_justification(VerticalJustification::Bottom, HorizontalJustification::Centre);
            let (container, children) = list_with(&mut t, list, &[40.0, 25.0, 60.0]);

            t.layout(&mut canvas);
            let bottom = t.absolute_rect(container).bottom();
            let last = t.absolute_rect(*children.last().unwrap()).bottom();
            assert!((last - bottom).abs() < 1e-3, "spacing {spacing}: {last} vs {bottom}");
        }
    }

    #[test]
    fn middle_justified_block_is_centred() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let list = VerticalList::default()
            .with_absolute_spacing(20.0)
            .with_justification(VerticalJustification::Middle, HorizontalJustification::Left);
        let (container, children) = list_with(&mut t, list, &[40.0, 40.0]);

        t.layout(&mut canvas);
        let rect = t.absolute_rect(container);
        let gap_top = rect.top() - t.absolute_rect(children[0]).top();
        let gap_bottom = t.absolute_rect(children[1]).bottom() - rect.bottom();
        assert!((gap_top - gap_bottom).abs() < 1e-3);
        assert_eq!(gap_top, 100.0);
    }

    #[test]
    fn horizontal_justification_sets_anchors() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let list = VerticalList::default().with_justification(VerticalJustification::Top, HorizontalJustification::Right);
        let container = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(100.0, 300.0)))
            .unwrap();
        t.make_vertical_list(container, list);
        let child = t.insert(container, ViewNode::new().with_size(UnifiedVec2::absolute(30.0, 10.0))).unwrap();

        t.layout(&mut canvas);
        let node = t.get(child).unwrap();
        assert_eq!(node.local_alignment(), AlignmentAnchor::TopRight);
        assert_eq!(node.parent_alignment(), AlignmentAnchor::TopRight);
        assert_eq!(t.absolute_rect(child).right(), t.absolute_rect(container).right());
    }

    #[test]
    fn relative_spacing_scales_with_container() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let (_, children) = list_with(&mut t, VerticalList::default().with_relative_spacing(0.1), &[10.0, 10.0]);
        t.layout(&mut canvas);
        assert_eq!(offsets(&t, &children), vec![0.0, -40.0]);
    }

    #[test]
    fn offscreen_list_is_not_arranged() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let (container, children) = list_with(&mut t, VerticalList::default().with_absolute_spacing(10.0), &[40.0; 2]);
        t.node_mut(container)
            .unwrap()
            .set_unified_position(UnifiedVec2::absolute(5000.0, 0.0));

        t.layout(&mut canvas);
        assert_eq!(offsets(&t, &children), vec![0.0, 0.0]);
    }

    #[test]
    fn params_parse_with_fallbacks() {
        let params = ParamDictionary::new()
            .with("VerticalJustification", "Bottom")
            .with("HorizontalJustification", "Diagonal")
            .with("AbsoluteSpacing", "12");
        let list = VerticalList::from_params(&params);
        assert_eq!(list.vertical, VerticalJustification::Bottom);
        assert_eq!(list.horizontal, HorizontalJustification::Centre);
        assert_eq!(list.absolute_spacing, 12.0);
        assert_eq!(list.relative_spacing, 0.0);
    }
}
