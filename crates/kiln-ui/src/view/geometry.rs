use kiln_engine::coords::{AlignmentAnchor, ColorRgba, Rect, Vec2};

use super::{Dirty, ViewId, ViewTree};

/// Component-wise division where a zero divisor yields zero.
fn div_or_zero(a: Vec2, b: Vec2) -> Vec2 {
    let d = |a: f32, b: f32| if b == 0.0 { 0.0 } else { a / b };
    Vec2::new(d(a.x, b.x), d(a.y, b.y))
}

impl ViewTree {
    pub fn screen_rect(&self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.screen_size())
    }

    /// Parent scale multiplied by the local scale.
    pub fn absolute_scale(&self, id: ViewId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::one();
        };
        if node.cache.is_dirty(Dirty::SCALE) {
            let parent = node.parent.map_or(Vec2::one(), |p| self.absolute_scale(p));
            node.cache.scale.set(parent.mul_elem(node.scale));
            node.cache.clean(Dirty::SCALE);
        }
        node.cache.scale.get()
    }

    /// Parent colour multiplied by the local colour when inheriting.
    pub fn absolute_colour(&self, id: ViewId) -> ColorRgba {
        let Some(node) = self.get(id) else {
            return ColorRgba::white();
        };
        if node.cache.is_dirty(Dirty::COLOUR) {
            let colour = match node.parent {
                Some(p) if node.inherit_colour => self.absolute_colour(p) * node.colour,
                _ => node.colour,
            };
            node.cache.colour.set(colour);
            node.cache.clean(Dirty::COLOUR);
        }
        node.cache.colour.get()
    }

    /// Size the node's unified values resolve against: the parent's size
    /// with its scale divided back out, or the screen for the root.
    pub fn parent_layout_size(&self, id: ViewId) -> Vec2 {
        match self.parent(id) {
            Some(p) => div_or_zero(self.absolute_size(p), self.absolute_scale(p)),
            None => self.screen_size(),
        }
    }

    /// Rectangle of the parent, or the screen for the root.
    pub fn parent_rect(&self, id: ViewId) -> Rect {
        match self.parent(id) {
            Some(p) => self.absolute_rect(p),
            None => self.screen_rect(),
        }
    }

    pub fn absolute_size(&self, id: ViewId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::zero();
        };
        if node.cache.is_dirty(Dirty::SIZE) {
            let size = node
                .unified_size
                .resolve(self.parent_layout_size(id))
                .mul_elem(self.absolute_scale(id));
            node.cache.size.set(size);
            node.cache.clean(Dirty::SIZE);
        }
        node.cache.size.get()
    }

    /// Bottom-left corner in screen pixels.
    pub fn absolute_position(&self, id: ViewId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::zero();
        };
        if node.cache.is_dirty(Dirty::POSITION) {
            let parent = self.parent_rect(id);
            let reference = if node.align_to_parent {
                parent.anchor_point(node.parent_alignment)
            } else {
                parent.origin
            };
            let size = self.absolute_size(id);
            let position = reference + node.unified_position.resolve(parent.size)
                - size.mul_elem(node.local_alignment.offset());
            node.cache.position.set(position);
            node.cache.clean(Dirty::POSITION);
        }
        node.cache.position.get()
    }

    pub fn absolute_rect(&self, id: ViewId) -> Rect {
        Rect::from_origin_size(self.absolute_position(id), self.absolute_size(id))
    }

    pub fn absolute_anchor_point(&self, id: ViewId, anchor: AlignmentAnchor) -> Vec2 {
        self.absolute_rect(id).anchor_point(anchor)
    }

    /// True when the node's rectangle lies entirely outside the screen.
    pub fn is_offscreen(&self, id: ViewId) -> bool {
        !self.absolute_rect(id).overlaps(self.screen_rect())
    }

    pub fn contains_point(&self, id: ViewId, point: Vec2) -> bool {
        self.absolute_rect(id).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use kiln_engine::coords::UnifiedVec2;

    use super::*;
    use crate::view::ViewNode;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    // ── size ──────────────────────────────────────────────────────────────

    #[test]
    fn size_resolves_against_parent() {
        let mut t = ViewTree::new(SCREEN);
        let parent = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::from_components(0.5, 0.5, 0.0, 0.0)))
            .unwrap();
        let child = t
            .insert(parent, ViewNode::new().with_size(UnifiedVec2::from_components(0.5, 1.0, 10.0, -20.0)))
            .unwrap();

        assert_eq!(t.absolute_size(parent), Vec2::new(400.0, 300.0));
        assert_eq!(t.absolute_size(child), Vec2::new(210.0, 280.0));
    }

    #[test]
    fn unit_scale_size_matches_plain_resolve() {
        let mut t = ViewTree::new(SCREEN);
        let sizes = [
            UnifiedVec2::from_components(0.3, 0.7, 5.0, 1.0),
            UnifiedVec2::from_components(1.0, 0.0, -3.0, 42.0),
            UnifiedVec2::absolute(12.0, 34.0),
        ];
        let mut parent = t.root();
        for size in sizes {
            let id = t.insert(parent, ViewNode::new().with_size(size)).unwrap();
            assert_eq!(t.absolute_size(id), size.resolve(t.absolute_size(parent)));
            parent = id;
        }
    }

    #[test]
    fn scale_multiplies_down_the_tree() {
        let mut t = ViewTree::new(SCREEN);
        let a = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(100.0, 50.0)).with_scale(Vec2::new(2.0, 2.0)))
            .unwrap();
        let b = t
            .insert(a, ViewNode::new().with_size(UnifiedVec2::relative(1.0, 1.0)).with_scale(Vec2::new(0.5, 3.0)))
            .unwrap();

        assert_eq!(t.absolute_scale(b), Vec2::new(1.0, 6.0));
        assert_eq!(t.absolute_size(a), Vec2::new(200.0, 100.0));
        // Parent layout size is 100x50; scaled by (1, 6).
        assert_eq!(t.absolute_size(b), Vec2::new(100.0, 300.0));
    }

    #[test]
    fn zero_parent_scale_does_not_produce_nan() {
        let mut t = ViewTree::new(SCREEN);
        let a = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(10.0, 10.0)).with_scale(Vec2::zero()))
            .unwrap();
        let b = t.insert(a, ViewNode::new().with_size(UnifiedVec2::relative(1.0, 1.0))).unwrap();
        assert!(t.absolute_size(b).is_finite());
    }

    // ── position ──────────────────────────────────────────────────────────

    #[test]
    fn anchored_child_sits_on_parent_anchor() {
        let mut t = ViewTree::new(SCREEN);
        let parent = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(200.0, 100.0)))
            .unwrap();
        for anchor in AlignmentAnchor::ALL {
            let child = t
                .insert(parent, ViewNode::new().with_size(UnifiedVec2::absolute(20.0, 10.0)).anchored(anchor))
                .unwrap();
            assert!(approx(
                t.absolute_anchor_point(child, anchor),
                t.absolute_anchor_point(parent, anchor)
            ));
        }
    }

    #[test]
    fn centred_view_in_screen() {
        let mut t = ViewTree::new(SCREEN);
        let v = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(100.0, 100.0)))
            .unwrap();
        assert_eq!(t.absolute_position(v), Vec2::new(350.0, 250.0));
    }

    #[test]
    fn unaligned_view_uses_parent_bottom_left() {
        let mut t = ViewTree::new(SCREEN);
        let mut node = ViewNode::new()
            .with_size(UnifiedVec2::absolute(10.0, 10.0))
            .with_position(UnifiedVec2::from_components(0.5, 0.0, 5.0, 7.0))
            .anchored(AlignmentAnchor::BottomLeft);
        node.set_align_to_parent(false);
        let v = t.insert(t.root(), node).unwrap();
        assert_eq!(t.absolute_position(v), Vec2::new(405.0, 7.0));
    }

    #[test]
    fn moving_parent_moves_child_cache() {
        let mut t = ViewTree::new(SCREEN);
        let a = t.insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(100.0, 100.0))).unwrap();
        let b = t.insert(a, ViewNode::new().with_size(UnifiedVec2::absolute(10.0, 10.0))).unwrap();
        let before = t.absolute_position(b);

        t.node_mut(a).unwrap().set_unified_position(UnifiedVec2::absolute(30.0, -20.0));
        assert_eq!(t.absolute_position(b), before + Vec2::new(30.0, -20.0));
    }

    // ── colour ────────────────────────────────────────────────────────────

    #[test]
    fn colour_inherits_multiplicatively() {
        let mut t = ViewTree::new(SCREEN);
        let a = t
            .insert(t.root(), ViewNode::new().with_colour(ColorRgba::new(0.5, 1.0, 1.0, 1.0)))
            .unwrap();
        let b = t
            .insert(a, ViewNode::new().with_colour(ColorRgba::new(0.5, 0.5, 1.0, 0.5)))
            .unwrap();
        assert_eq!(t.absolute_colour(b), ColorRgba::new(0.25, 0.5, 1.0, 0.5));

        t.node_mut(b).unwrap().set_inherit_colour(false);
        assert_eq!(t.absolute_colour(b), ColorRgba::new(0.5, 0.5, 1.0, 0.5));
    }

    #[test]
    fn screen_resize_invalidates() {
        let mut t = ViewTree::new(SCREEN);
        let v = t.insert(t.root(), ViewNode::new().with_size(UnifiedVec2::relative(0.5, 0.5))).unwrap();
        assert_eq!(t.absolute_size(v), Vec2::new(400.0, 300.0));
        t.set_screen_size(Vec2::new(100.0, 100.0));
        assert_eq!(t.absolute_size(v), Vec2::new(50.0, 50.0));
    }
}
