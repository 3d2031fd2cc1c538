use kiln_engine::canvas::Canvas;
use kiln_engine::coords::{UnifiedVec2, Vec2};

use crate::view::{Dirty, ViewId, ViewTree};

use super::SizePolicy;

/// Measuring bounds for content that should lay out without wrapping.
const UNBOUNDED: Vec2 = Vec2::new(f32::INFINITY, f32::INFINITY);

impl ViewTree {
    /// Records `policy` and applies it immediately using the content's
    /// current natural size. Autosizing needs a canvas and waits for the next
    /// [`layout`](ViewTree::layout).
    pub fn set_size_policy(&mut self, id: ViewId, policy: SizePolicy) {
        let Some(node) = self.raw_mut(id) else { return };
        node.set_size_policy(policy);
        node.cache.mark(Dirty::LAYOUT);
        let natural = self.natural_size(id);
        self.apply_size_policy(id, policy, natural);
    }

    /// Content's natural size, if it has content that reports one.
    pub fn natural_size(&self, id: ViewId) -> Option<Vec2> {
        self.get(id)?.content()?.natural_size()
    }

    /// Width becomes `(rel_w, abs_w)`; height follows from the content's
    /// aspect ratio.
    pub fn set_width_maintaining_aspect(&mut self, id: ViewId, rel_w: f32, abs_w: f32) {
        if let Some(node) = self.raw_mut(id) {
            node.set_size_policy(SizePolicy::WidthMaintainingAspect);
        }
        let natural = self.natural_size(id);
        self.width_maintaining_aspect(id, rel_w, abs_w, natural);
    }

    /// Height becomes `(rel_h, abs_h)`; width follows from the content's
    /// aspect ratio.
    pub fn set_height_maintaining_aspect(&mut self, id: ViewId, rel_h: f32, abs_h: f32) {
        if let Some(node) = self.raw_mut(id) {
            node.set_size_policy(SizePolicy::HeightMaintainingAspect);
        }
        let natural = self.natural_size(id);
        self.height_maintaining_aspect(id, rel_h, abs_h, natural);
    }

    pub fn set_fill_maintaining_aspect(&mut self, id: ViewId, target: UnifiedVec2) {
        self.set_size_policy(id, SizePolicy::FillMaintainingAspect(target));
    }

    pub fn set_fit_maintaining_aspect(&mut self, id: ViewId, target: UnifiedVec2) {
        self.set_size_policy(id, SizePolicy::FitMaintainingAspect(target));
    }

    // ── policy application ────────────────────────────────────────────────

    pub(crate) fn apply_size_policy(&mut self, id: ViewId, policy: SizePolicy, natural: Option<Vec2>) {
        let Some(current) = self.get(id).map(|n| n.unified_size()) else { return };
        match policy {
            SizePolicy::Fixed | SizePolicy::Autosize { .. } => {}
            SizePolicy::SizeFromContent => {
                if let Some(n) = natural {
                    self.set_unified_size(id, UnifiedVec2::absolute(n.x, n.y));
                }
            }
            SizePolicy::WidthFromContent => {
                if let Some(n) = natural {
                    let size = UnifiedVec2::from_components(0.0, current.relative.y, n.x, current.absolute.y);
                    self.set_unified_size(id, size);
                }
            }
            SizePolicy::HeightFromContent => {
                if let Some(n) = natural {
                    let size = UnifiedVec2::from_components(current.relative.x, 0.0, current.absolute.x, n.y);
                    self.set_unified_size(id, size);
                }
            }
            SizePolicy::WidthMaintainingAspect => {
                self.width_maintaining_aspect(id, current.relative.x, current.absolute.x, natural);
            }
            SizePolicy::HeightMaintainingAspect => {
                self.height_maintaining_aspect(id, current.relative.y, current.absolute.y, natural);
            }
            SizePolicy::FillMaintainingAspect(target) => {
                self.aspect_within_parent(id, target, natural, false);
            }
            SizePolicy::FitMaintainingAspect(target) => {
                self.aspect_within_parent(id, target, natural, true);
            }
        }
    }

    /// Applies the node's recorded policy, measuring its content on `canvas`.
    pub(crate) fn layout_size(&mut self, id: ViewId, canvas: &mut dyn Canvas) {
        let Some(policy) = self.get(id).map(|n| n.size_policy()) else { return };
        match policy {
            SizePolicy::Fixed => {}
            SizePolicy::Autosize { min, max } => {
                let stale = self.get(id).is_some_and(|n| n.dirty().intersects(Dirty::CONTENT | Dirty::LAYOUT));
                if stale {
                    self.autosize(id, min, max, canvas);
                }
            }
            _ => {
                let natural = self
                    .raw_mut(id)
                    .and_then(|n| n.content.as_deref_mut())
                    .map(|c| c.measure(canvas, UNBOUNDED));
                self.apply_size_policy(id, policy, natural);
            }
        }
    }

    fn width_maintaining_aspect(&mut self, id: ViewId, rel_w: f32, abs_w: f32, natural: Option<Vec2>) {
        self.set_unified_size(id, UnifiedVec2::from_components(rel_w, 0.0, abs_w, 0.0));

        let scale_y = self.absolute_scale(id).y;
        if scale_y == 0.0 {
            return;
        }
        let Some(n) = natural.filter(|n| n.x != 0.0) else {
            log::debug!("width aspect: {id:?} has no usable natural size");
            return;
        };
        let abs_h = (n.y / n.x) * self.absolute_size(id).x / scale_y;
        self.set_unified_size(id, UnifiedVec2::from_components(rel_w, 0.0, abs_w, abs_h));
    }

    fn height_maintaining_aspect(&mut self, id: ViewId, rel_h: f32, abs_h: f32, natural: Option<Vec2>) {
        self.set_unified_size(id, UnifiedVec2::from_components(0.0, rel_h, 0.0, abs_h));

        let scale_x = self.absolute_scale(id).x;
        if scale_x == 0.0 {
            return;
        }
        let Some(n) = natural.filter(|n| n.y != 0.0) else {
            log::debug!("height aspect: {id:?} has no usable natural size");
            return;
        };
        let abs_w = (n.x / n.y) * self.absolute_size(id).y / scale_x;
        self.set_unified_size(id, UnifiedVec2::from_components(0.0, rel_h, abs_w, abs_h));
    }

    /// Fill (`fit == false`) or fit the target box by constraining whichever
    /// axis the ratios select. The comparisons differ only on ties.
    fn aspect_within_parent(&mut self, id: ViewId, target: UnifiedVec2, natural: Option<Vec2>, fit: bool) {
        let Some(parent) = self.parent(id) else { return };
        let Some(n) = natural else {
            log::debug!("aspect: {id:?} has no natural size");
            return;
        };

        let p = self.absolute_size(parent);
        let parent_ratio = (p.x * target.relative.x) / (p.y * target.relative.y);
        let image_ratio = n.x / n.y;

        let by_width = if fit {
            image_ratio > parent_ratio
        } else {
            image_ratio <= parent_ratio
        };
        if by_width {
            self.width_maintaining_aspect(id, target.relative.x, target.absolute.x, natural);
        } else {
            self.height_maintaining_aspect(id, target.relative.y, target.absolute.y, natural);
        }
    }

    /// Sizes the node to its measured content within `[min, max]`, both
    /// resolved against the parent's layout size.
    fn autosize(&mut self, id: ViewId, min: UnifiedVec2, max: UnifiedVec2, canvas: &mut dyn Canvas) {
        let layout = self.parent_layout_size(id);
        let min_px = min.resolve(layout);
        let max_px = max.resolve(layout);

        let Some(content) = self.raw_mut(id).and_then(|n| n.content.as_deref_mut()) else {
            return;
        };

        let first = content.measure(canvas, max_px);
        let (rel_w, abs_w, measured) = if first.x < min_px.x {
            (min.relative.x, min.absolute.x, content.measure(canvas, min_px))
        } else if first.x < max_px.x {
            let m = content.measure(canvas, Vec2::new(first.x, max_px.y));
            (0.0, first.x, m)
        } else {
            (max.relative.x, max.absolute.x, first)
        };

        let (rel_h, abs_h) = if measured.y > max_px.y {
            (max.relative.y, max.absolute.y)
        } else if measured.y < min_px.y {
            (min.relative.y, min.absolute.y)
        } else {
            (0.0, measured.y)
        };

        self.set_unified_size(id, UnifiedVec2::from_components(rel_w, rel_h, abs_w, abs_h));
    }
}

#[cfg(test)]
mod tests {
    use kiln_engine::canvas::{FontId, TextureId};

    use super::*;
    use crate::content::testing::FakeCanvas;
    use crate::content::{Image, Label};
    use crate::resources::TextureInfo;
    use crate::view::ViewNode;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn image(w: f32, h: f32) -> Image {
        Image::new(TextureInfo { id: TextureId(0), size: Vec2::new(w, h) })
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn image_node(tree: &mut ViewTree, parent: ViewId, w: f32, h: f32) -> ViewId {
        tree.insert(parent, ViewNode::new().with_content(image(w, h))).unwrap()
    }

    // ── aspect ────────────────────────────────────────────────────────────

    #[test]
    fn width_maintaining_preserves_natural_ratio() {
        let mut t = ViewTree::new(SCREEN);
        let root = t.root();
        for (w, h, rel, abs) in [(200.0, 100.0, 0.5, 0.0), (64.0, 256.0, 0.0, 50.0), (3.0, 7.0, 0.25, 10.0)] {
            let id = image_node(&mut t, root, w, h);
            t.set_width_maintaining_aspect(id, rel, abs);
            let size = t.absolute_size(id);
            assert!(close(size.x / size.y, w / h), "{w}x{h}: {size:?}");
        }
    }

    #[test]
    fn height_maintaining_preserves_natural_ratio() {
        let mut t = ViewTree::new(SCREEN);
        let root = t.root();
        let id = image_node(&mut t, root, 300.0, 150.0);
        t.set_height_maintaining_aspect(id, 0.5, 0.0);
        assert_eq!(t.absolute_size(id), Vec2::new(600.0, 300.0));
    }

    #[test]
    fn aspect_respects_scale() {
        let mut t = ViewTree::new(SCREEN);
        let scaled = t
            .insert(t.root(), ViewNode::new().with_size(UnifiedVec2::relative(1.0, 1.0)).with_scale(Vec2::new(2.0, 2.0)))
            .unwrap();
        let id = image_node(&mut t, scaled, 100.0, 50.0);
        t.set_width_maintaining_aspect(id, 0.0, 40.0);
        let size = t.absolute_size(id);
        assert!(close(size.x, 80.0) && close(size.y, 40.0), "{size:?}");
    }

    #[test]
    fn zero_scale_stops_after_setting_width() {
        let mut t = ViewTree::new(SCREEN);
        let id = t
            .insert(t.root(), ViewNode::new().with_content(image(10.0, 20.0)).with_scale(Vec2::new(1.0, 0.0)))
            .unwrap();
        t.set_width_maintaining_aspect(id, 0.0, 30.0);
        assert_eq!(t.get(id).unwrap().unified_size(), UnifiedVec2::from_components(0.0, 0.0, 30.0, 0.0));
    }

    #[test]
    fn no_content_only_sets_the_driving_axis() {
        let mut t = ViewTree::new(SCREEN);
        let id = t.insert(t.root(), ViewNode::new()).unwrap();
        t.set_height_maintaining_aspect(id, 0.0, 25.0);
        assert_eq!(t.get(id).unwrap().unified_size(), UnifiedVec2::from_components(0.0, 0.0, 0.0, 25.0));
        assert_eq!(t.get(id).unwrap().size_policy(), SizePolicy::HeightMaintainingAspect);
    }

    // ── fill / fit ────────────────────────────────────────────────────────

    #[test]
    fn fill_covers_and_fit_contains() {
        let mut t = ViewTree::new(SCREEN);
        let root = t.root();
        let target = UnifiedVec2::relative(1.0, 1.0);

        // Wide image in a 4:3 parent.
        let fill = image_node(&mut t, root, 200.0, 100.0);
        t.set_fill_maintaining_aspect(fill, target);
        assert_eq!(t.absolute_size(fill), Vec2::new(1200.0, 600.0));

        let fit = image_node(&mut t, root, 200.0, 100.0);
        t.set_fit_maintaining_aspect(fit, target);
        assert_eq!(t.absolute_size(fit), Vec2::new(800.0, 400.0));
    }

    #[test]
    fn fill_and_fit_tie_break() {
        let mut t = ViewTree::new(SCREEN);
        let root = t.root();
        let target = UnifiedVec2::relative(1.0, 1.0);

        // Same ratio as the screen: fill goes by width, fit by height.
        let fill = image_node(&mut t, root, 400.0, 300.0);
        t.set_fill_maintaining_aspect(fill, target);
        assert_eq!(t.get(fill).unwrap().unified_size().relative, Vec2::new(1.0, 0.0));

        let fit = image_node(&mut t, root, 400.0, 300.0);
        t.set_fit_maintaining_aspect(fit, target);
        assert_eq!(t.get(fit).unwrap().unified_size().relative, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn policy_is_reapplied_by_layout() {
        let mut t = ViewTree::new(SCREEN);
        let root = t.root();
        let mut canvas = FakeCanvas::default();
        let id = image_node(&mut t, root, 100.0, 100.0);
        t.set_fit_maintaining_aspect(id, UnifiedVec2::relative(1.0, 1.0));
        assert_eq!(t.absolute_size(id), Vec2::new(600.0, 600.0));

        t.set_screen_size(Vec2::new(300.0, 900.0));
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id), Vec2::new(300.0, 300.0));
    }

    // ── content ───────────────────────────────────────────────────────────

    #[test]
    fn size_from_content_variants() {
        let mut t = ViewTree::new(SCREEN);
        let base = UnifiedVec2::from_components(0.5, 0.5, 1.0, 2.0);

        let both = t.insert(t.root(), ViewNode::new().with_size(base).with_content(image(30.0, 40.0))).unwrap();
        t.set_size_policy(both, SizePolicy::SizeFromContent);
        assert_eq!(t.get(both).unwrap().unified_size(), UnifiedVec2::absolute(30.0, 40.0));

        let width = t.insert(t.root(), ViewNode::new().with_size(base).with_content(image(30.0, 40.0))).unwrap();
        t.set_size_policy(width, SizePolicy::WidthFromContent);
        assert_eq!(t.get(width).unwrap().unified_size(), UnifiedVec2::from_components(0.0, 0.5, 30.0, 2.0));

        let height = t.insert(t.root(), ViewNode::new().with_size(base).with_content(image(30.0, 40.0))).unwrap();
        t.set_size_policy(height, SizePolicy::HeightFromContent);
        assert_eq!(t.get(height).unwrap().unified_size(), UnifiedVec2::from_components(0.5, 0.0, 1.0, 40.0));
    }

    #[test]
    fn label_size_from_content_measures_on_layout() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = t
            .insert(
                t.root(),
                ViewNode::new()
                    .with_content(Label::new("four", FontId(0)))
                    .with_size_policy(SizePolicy::SizeFromContent),
            )
            .unwrap();
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id), Vec2::new(40.0, 20.0));
    }

    // ── autosize ──────────────────────────────────────────────────────────

    fn autosized(t: &mut ViewTree, text: &str, min: UnifiedVec2, max: UnifiedVec2) -> ViewId {
        t.insert(
            t.root(),
            ViewNode::new()
                .with_content(Label::new(text, FontId(0)))
                .with_size_policy(SizePolicy::Autosize { min, max }),
        )
        .unwrap()
    }

    #[test]
    fn autosize_uses_content_width_between_bounds() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = autosized(&mut t, "hello", UnifiedVec2::absolute(10.0, 10.0), UnifiedVec2::absolute(200.0, 100.0));
        t.layout(&mut canvas);
        assert_eq!(t.get(id).unwrap().unified_size(), UnifiedVec2::absolute(50.0, 20.0));
    }

    #[test]
    fn autosize_clamps_to_min() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let min = UnifiedVec2::from_components(0.0, 0.0, 100.0, 40.0);
        let id = autosized(&mut t, "hi", min, UnifiedVec2::absolute(200.0, 100.0));
        t.layout(&mut canvas);
        assert_eq!(t.get(id).unwrap().unified_size(), min);
    }

    #[test]
    fn autosize_wraps_and_clamps_to_max() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let max = UnifiedVec2::from_components(0.0, 0.0, 60.0, 30.0);
        let id = autosized(&mut t, "aaaa bbbb cccc", UnifiedVec2::zero(), max);
        t.layout(&mut canvas);
        // Wrapped to three 40px lines: width follows the text, height is
        // clamped to the max box.
        assert_eq!(t.get(id).unwrap().unified_size(), UnifiedVec2::absolute(40.0, 30.0));
    }

    #[test]
    fn autosize_reacts_to_text_change() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = autosized(&mut t, "ab", UnifiedVec2::zero(), UnifiedVec2::absolute(500.0, 100.0));
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id).x, 20.0);

        t.content_mut::<Label>(id).unwrap().set_text("abcdef");
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id).x, 60.0);
    }

    #[test]
    fn autosize_remeasures_after_resize_even_if_geometry_was_read() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let max = UnifiedVec2::from_components(0.1, 0.0, 0.0, 100.0);
        let id = autosized(&mut t, "hello", UnifiedVec2::zero(), max);
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id).x, 50.0);

        t.set_screen_size(Vec2::new(400.0, 600.0));
        // Hit-testing or scrolling may read geometry before the next pass.
        let _ = t.absolute_rect(id);
        t.layout(&mut canvas);
        let size = t.absolute_size(id);
        assert!(size.x <= 40.0, "{size:?}");
    }

    #[test]
    fn switching_to_autosize_applies_on_next_layout() {
        let mut t = ViewTree::new(SCREEN);
        let mut canvas = FakeCanvas::default();
        let id = t.insert(t.root(), ViewNode::new().with_content(Label::new("abc", FontId(0)))).unwrap();
        t.layout(&mut canvas);

        let bounds = UnifiedVec2::absolute(500.0, 100.0);
        t.set_size_policy(id, SizePolicy::Autosize { min: UnifiedVec2::zero(), max: bounds });
        t.layout(&mut canvas);
        assert_eq!(t.absolute_size(id), Vec2::new(30.0, 20.0));
    }
}
