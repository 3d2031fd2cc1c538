use kiln_engine::coords::{AlignmentAnchor, UnifiedVec2, Vec2};
use kiln_engine::input::PointerEvent;

use crate::view::{ViewId, ViewNode, ViewTree};

use super::LayoutPolicy;

/// Velocity multiplier applied every tick once the pointer is released.
pub const SCROLL_DECAY: f32 = 0.9;

/// Speed in pixels per tick below which a coasting scroll stops.
pub const MIN_SCROLL_SPEED: f32 = 0.01;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
struct TouchState {
    active: bool,
    moved: bool,
    last_position: Vec2,
    /// Position to adopt as `last_position` on the next tick.
    pending_position: Vec2,
    total_travel_squared: f32,
}

/// Scroll physics for a node whose children live in a movable content node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollState {
    pub(crate) content: ViewId,
    velocity: Vec2,
    touch: TouchState,
    horizontal: bool,
    vertical: bool,
    accept_outside: bool,
}

impl ScrollState {
    fn new(content: ViewId) -> Self {
        Self {
            content,
            velocity: Vec2::zero(),
            touch: TouchState::default(),
            horizontal: true,
            vertical: true,
            accept_outside: false,
        }
    }

    pub fn content(&self) -> ViewId {
        self.content
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.touch.active
    }

    /// Sum of squared per-move displacements since the last press.
    pub fn touch_travel_squared(&self) -> f32 {
        self.touch.total_travel_squared
    }

    pub fn horizontal_enabled(&self) -> bool {
        self.horizontal
    }

    pub fn vertical_enabled(&self) -> bool {
        self.vertical
    }

    pub fn accepts_touches_outside(&self) -> bool {
        self.accept_outside
    }

    fn press(&mut self, position: Vec2) {
        self.touch.active = true;
        self.touch.last_position = position;
        self.touch.total_travel_squared = 0.0;
        self.velocity = Vec2::zero();
    }

    fn drag(&mut self, position: Vec2) {
        let mut v = position - self.touch.last_position;
        self.touch.total_travel_squared += v.length_squared();
        if !self.horizontal {
            v.x = 0.0;
        }
        if !self.vertical {
            v.y = 0.0;
        }
        self.velocity = v;
        self.touch.pending_position = position;
        self.touch.moved = true;
    }

    fn release(&mut self) {
        self.touch.active = false;
    }

    /// Velocity to apply this tick. A press held still does not drift.
    fn pending_velocity(&self) -> Vec2 {
        if self.touch.active && !self.touch.moved {
            Vec2::zero()
        } else {
            self.velocity
        }
    }

    /// Post-move bookkeeping for one tick.
    fn settle(&mut self) {
        if !self.touch.active {
            self.velocity *= SCROLL_DECAY;
            if self.velocity.length_squared() < MIN_SCROLL_SPEED * MIN_SCROLL_SPEED {
                self.velocity = Vec2::zero();
            }
        }
        if self.touch.moved {
            self.touch.last_position = self.touch.pending_position;
            self.touch.moved = false;
        }
    }
}

/// Velocity along one axis such that content spanning `content` stops flush
/// with the container's edges instead of overshooting them. The low edge is
/// tested first. Content no larger than the container does not move.
fn clamp_axis(v: f32, content: (f32, f32), container: (f32, f32)) -> f32 {
    let (c_lo, c_hi) = content;
    let (lo, hi) = container;
    if c_hi - c_lo <= hi - lo {
        0.0
    } else if c_lo + v >= lo {
        lo - c_lo
    } else if c_hi + v <= hi {
        hi - c_hi
    } else {
        v
    }
}

impl ViewTree {
    /// Turns `id` into a scroll view. Its existing children move into a new
    /// content node that fills the view and is pinned to its top-left; later
    /// insertions under `id` land there too. Returns the content node.
    pub fn make_scroll_view(&mut self, id: ViewId) -> Option<ViewId> {
        if let Some(LayoutPolicy::Scroll(state)) = self.get(id)?.layout_policy() {
            return Some(state.content);
        }

        let existing = self.children(id).to_vec();
        let mut content = ViewNode::new()
            .named("content")
            .with_size(UnifiedVec2::relative(1.0, 1.0))
            .anchored(AlignmentAnchor::TopLeft);
        content.set_consumes_touches(false);
        let content = self.insert(id, content)?;

        for child in existing {
            self.reparent(child, content);
        }

        let node = self.node_mut(id)?;
        node.set_clip_subviews(true);
        node.layout_policy = Some(LayoutPolicy::Scroll(ScrollState::new(content)));
        Some(content)
    }

    pub fn scroll_state(&self, id: ViewId) -> Option<&ScrollState> {
        match self.get(id)?.layout_policy()? {
            LayoutPolicy::Scroll(state) => Some(state),
            _ => None,
        }
    }

    fn scroll_state_mut(&mut self, id: ViewId) -> Option<&mut ScrollState> {
        match self.raw_mut(id)?.layout_policy.as_mut()? {
            LayoutPolicy::Scroll(state) => Some(state),
            _ => None,
        }
    }

    pub fn set_scroll_velocity(&mut self, id: ViewId, velocity: Vec2) {
        if let Some(state) = self.scroll_state_mut(id) {
            state.velocity = velocity;
        }
    }

    pub fn set_horizontal_scrolling(&mut self, id: ViewId, on: bool) {
        if let Some(state) = self.scroll_state_mut(id) {
            state.horizontal = on;
        }
    }

    pub fn is_horizontal_scrolling_enabled(&self, id: ViewId) -> bool {
        self.scroll_state(id).is_some_and(|s| s.horizontal)
    }

    pub fn set_vertical_scrolling(&mut self, id: ViewId, on: bool) {
        if let Some(state) = self.scroll_state_mut(id) {
            state.vertical = on;
        }
    }

    pub fn is_vertical_scrolling_enabled(&self, id: ViewId) -> bool {
        self.scroll_state(id).is_some_and(|s| s.vertical)
    }

    /// Lets a drag that leaves the view keep scrolling it.
    pub fn set_scroll_accepts_touches_outside(&mut self, id: ViewId, on: bool) {
        if let Some(state) = self.scroll_state_mut(id) {
            state.accept_outside = on;
        }
    }

    /// Stops motion and returns the content to its rest position.
    pub fn reset_scroll(&mut self, id: ViewId) {
        let Some(state) = self.scroll_state_mut(id) else { return };
        state.velocity = Vec2::zero();
        let content = state.content;
        self.set_unified_position(content, UnifiedVec2::zero());
    }

    /// Resets, then offsets the content by `position` resolved against the
    /// content's own size.
    pub fn scroll_jump_to(&mut self, id: ViewId, position: UnifiedVec2) {
        let Some(content) = self.scroll_state(id).map(|s| s.content) else { return };
        self.reset_scroll(id);
        let offset = position.resolve(self.absolute_size(content));
        self.move_scroll_content(content, offset);
    }

    pub fn set_absolute_content_size(&mut self, id: ViewId, size: Vec2) {
        if let Some(content) = self.scroll_state(id).map(|s| s.content) {
            self.set_unified_size(content, UnifiedVec2::absolute(size.x, size.y));
        }
    }

    pub fn absolute_content_size(&self, id: ViewId) -> Vec2 {
        self.scroll_state(id)
            .map_or(Vec2::zero(), |s| self.absolute_size(s.content))
    }

    /// Content's top-left relative to the view's top-left.
    pub fn absolute_content_position(&self, id: ViewId) -> Vec2 {
        let Some(state) = self.scroll_state(id) else {
            return Vec2::zero();
        };
        self.absolute_anchor_point(state.content, AlignmentAnchor::TopLeft)
            - self.absolute_anchor_point(id, AlignmentAnchor::TopLeft)
    }

    fn move_scroll_content(&mut self, content: ViewId, by: Vec2) {
        if by == Vec2::zero() {
            return;
        }
        if let Some(position) = self.get(content).map(|n| n.unified_position()) {
            let moved = UnifiedVec2::new(position.relative, position.absolute + by);
            self.set_unified_position(content, moved);
        }
    }

    // ── tick ──────────────────────────────────────────────────────────────

    /// Advances every visible scroll view by one tick.
    pub fn update(&mut self) {
        let scrollers: Vec<ViewId> = self
            .descendants(self.root())
            .into_iter()
            .filter(|id| self.scroll_state(*id).is_some())
            .collect();
        for id in scrollers {
            self.tick_scroll(id);
        }
    }

    fn tick_scroll(&mut self, id: ViewId) {
        let Some(node) = self.get(id) else { return };
        if !node.is_visible() {
            return;
        }
        let Some(mut state) = self.scroll_state(id).copied() else { return };

        let view = self.absolute_rect(id);
        let content = self.absolute_rect(state.content);

        let velocity = state.pending_velocity();
        let v = Vec2::new(
            clamp_axis(
                velocity.x,
                (content.left(), content.right()),
                (view.left(), view.right()),
            ),
            // Y-up: keep the content's top at or above the view's top and its
            // bottom at or below the view's bottom.
            -clamp_axis(
                -velocity.y,
                (-content.top(), -content.bottom()),
                (-view.top(), -view.bottom()),
            ),
        );

        self.move_scroll_content(state.content, v);

        state.velocity = v;
        state.settle();
        if let Some(slot) = self.scroll_state_mut(id) {
            *slot = state;
        }
    }

    // ── pointer hooks (called from input routing) ─────────────────────────

    pub(crate) fn scroll_pointer_down(&mut self, id: ViewId, event: &PointerEvent) {
        let interactive = self.get(id).is_some_and(|n| n.user_interaction() && n.is_visible());
        if let Some(state) = self.scroll_state_mut(id).filter(|_| interactive) {
            state.press(event.position);
        }
    }

    pub(crate) fn scroll_pointer_moved(&mut self, id: ViewId, event: &PointerEvent, inside: bool) {
        let interactive = self.get(id).is_some_and(|n| n.user_interaction() && n.is_visible());
        if let Some(state) = self.scroll_state_mut(id).filter(|_| interactive) {
            if state.touch.active && (inside || state.accept_outside) {
                state.drag(event.position);
            }
        }
    }

    pub(crate) fn scroll_pointer_up(&mut self, id: ViewId) {
        let interactive = self.get(id).is_some_and(|n| n.user_interaction() && n.is_visible());
        if let Some(state) = self.scroll_state_mut(id).filter(|_| interactive) {
            state.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    /// A 200x100 scroll view at the screen's bottom-left with 200x400 content.
    fn scroller() -> (ViewTree, ViewId, ViewId) {
        let mut t = ViewTree::new(SCREEN);
        let view = t
            .insert(
                t.root(),
                ViewNode::new()
                    .with_size(UnifiedVec2::absolute(200.0, 100.0))
                    .anchored(AlignmentAnchor::BottomLeft),
            )
            .unwrap();
        let content = t.make_scroll_view(view).unwrap();
        t.set_absolute_content_size(view, Vec2::new(200.0, 400.0));
        (t, view, content)
    }

    #[test]
    fn content_node_fills_and_pins_top_left() {
        let mut t = ViewTree::new(SCREEN);
        let view = t.insert(t.root(), ViewNode::new().with_size(UnifiedVec2::absolute(200.0, 100.0))).unwrap();
        let content = t.make_scroll_view(view).unwrap();

        assert_eq!(t.absolute_rect(content), t.absolute_rect(view));
        assert!(!t.get(content).unwrap().consumes_touches());
        assert!(t.get(view).unwrap().clip_subviews());
        assert_eq!(t.make_scroll_view(view), Some(content));
    }

    #[test]
    fn insert_redirects_into_content_and_existing_children_move() {
        let mut t = ViewTree::new(SCREEN);
        let view = t.insert(t.root(), ViewNode::new()).unwrap();
        let early = t.insert(view, ViewNode::new().named("early")).unwrap();
        let content = t.make_scroll_view(view).unwrap();
        let late = t.insert(view, ViewNode::new().named("late")).unwrap();

        assert_eq!(t.children(view), &[content]);
        assert_eq!(t.children(content), &[early, late]);
        assert_eq!(t.parent(early), Some(content));
    }

    #[test]
    fn content_starts_flush_with_top() {
        let (t, view, _) = scroller();
        assert_eq!(t.absolute_content_position(view), Vec2::zero());
        assert_eq!(t.absolute_content_size(view), Vec2::new(200.0, 400.0));
    }

    #[test]
    fn cannot_scroll_past_top() {
        let (mut t, view, _) = scroller();
        // Downward velocity would pull the content's top below the view's top.
        t.set_scroll_velocity(view, Vec2::new(0.0, -30.0));
        t.update();
        assert_eq!(t.absolute_content_position(view), Vec2::zero());
    }

    #[test]
    fn scroll_up_lands_flush_with_bottom() {
        let (mut t, view, content) = scroller();
        t.set_scroll_velocity(view, Vec2::new(0.0, 350.0));
        t.update();
        // 300 px of overflow: the content stops with its bottom on the view's.
        assert_eq!(t.absolute_content_position(view), Vec2::new(0.0, 300.0));
        assert_eq!(t.absolute_rect(content).bottom(), t.absolute_rect(view).bottom());

        for _ in 0..10 {
            t.update();
        }
        assert_eq!(t.absolute_rect(content).bottom(), t.absolute_rect(view).bottom());
    }

    #[test]
    fn axis_that_fits_never_moves() {
        let (mut t, view, _) = scroller();
        t.set_scroll_velocity(view, Vec2::new(40.0, 10.0));
        t.update();
        assert_eq!(t.absolute_content_position(view).x, 0.0);
        assert_eq!(t.absolute_content_position(view).y, 10.0);
    }

    #[test]
    fn decay_strictly_decreases_and_reaches_zero() {
        let (mut t, view, _) = scroller();
        t.set_absolute_content_size(view, Vec2::new(200.0, 100_000.0));
        t.set_scroll_velocity(view, Vec2::new(0.0, 20.0));

        let mut previous = f32::INFINITY;
        let mut ticks = 0;
        while t.scroll_state(view).unwrap().velocity() != Vec2::zero() {
            let speed = t.scroll_state(view).unwrap().velocity().length();
            assert!(speed < previous);
            previous = speed;
            t.update();
            ticks += 1;
            assert!(ticks < 200, "velocity never settled");
        }
    }

    #[test]
    fn drag_moves_content_and_stationary_press_stops_it() {
        let (mut t, view, _) = scroller();
        let start = PointerEvent::mouse(100.0, 50.0);

        assert!(t.on_pointer_down(&start));
        t.on_pointer_moved(&start.at(Vec2::new(100.0, 70.0)));
        t.update();
        assert_eq!(t.absolute_content_position(view), Vec2::new(0.0, 20.0));

        // Held still: no drift.
        t.update();
        assert_eq!(t.absolute_content_position(view), Vec2::new(0.0, 20.0));
        assert_eq!(t.scroll_state(view).unwrap().velocity(), Vec2::zero());

        t.on_pointer_moved(&start.at(Vec2::new(100.0, 80.0)));
        t.on_pointer_up(&start.at(Vec2::new(100.0, 80.0)));
        t.update();
        assert_eq!(t.absolute_content_position(view), Vec2::new(0.0, 30.0));
        // Released: coasting at decayed speed.
        let v = t.scroll_state(view).unwrap().velocity();
        assert!(v.x == 0.0 && (v.y - 9.0).abs() < 1e-4, "{v:?}");
    }

    #[test]
    fn disabled_axis_is_ignored_while_dragging() {
        let (mut t, view, _) = scroller();
        t.set_vertical_scrolling(view, false);
        assert!(!t.is_vertical_scrolling_enabled(view));

        let start = PointerEvent::mouse(100.0, 50.0);
        t.on_pointer_down(&start);
        t.on_pointer_moved(&start.at(Vec2::new(100.0, 90.0)));
        assert_eq!(t.scroll_state(view).unwrap().velocity(), Vec2::zero());
        assert_eq!(t.scroll_state(view).unwrap().touch_travel_squared(), 1600.0);
    }

    #[test]
    fn jump_to_resolves_against_content_size() {
        let (mut t, view, _) = scroller();
        t.set_scroll_velocity(view, Vec2::new(0.0, 5.0));
        t.scroll_jump_to(view, UnifiedVec2::from_components(0.0, 0.5, 0.0, 10.0));
        assert_eq!(t.absolute_content_position(view), Vec2::new(0.0, 210.0));
        assert_eq!(t.scroll_state(view).unwrap().velocity(), Vec2::zero());

        t.reset_scroll(view);
        assert_eq!(t.absolute_content_position(view), Vec2::zero());
    }

    #[test]
    fn hidden_scroll_view_does_not_tick() {
        let (mut t, view, _) = scroller();
        t.set_scroll_velocity(view, Vec2::new(0.0, 20.0));
        t.node_mut(view).unwrap().set_visible(false);
        t.update();
        assert_eq!(t.absolute_content_position(view), Vec2::zero());
        assert_eq!(t.scroll_state(view).unwrap().velocity(), Vec2::new(0.0, 20.0));
    }
}
