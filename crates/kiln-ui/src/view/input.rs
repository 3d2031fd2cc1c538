//! Pointer routing.
//!
//! A press is offered to the deepest visible, interactive view under the
//! pointer, topmost sibling first. Every view the press passes through
//! captures the pointer and receives its moves and the release, wherever the
//! pointer goes afterwards.

use kiln_engine::input::{PointerEvent, PointerId};

use crate::content::PointerContext;

use super::{ViewId, ViewTree};

#[derive(Copy, Clone)]
enum Phase {
    Moved,
    Up,
}

impl ViewTree {
    /// Routes a press. Returns `true` when a view consumed it.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> bool {
        self.pointer_down_at(self.root(), event)
    }

    /// Routes a move to every view holding the pointer.
    pub fn on_pointer_moved(&mut self, event: &PointerEvent) {
        self.route_captured(event, Phase::Moved);
    }

    /// Routes a release to every view holding the pointer and frees it.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        self.route_captured(event, Phase::Up);
    }

    /// Views currently holding `pointer`, in pre-order.
    pub fn captured_by(&self, pointer: PointerId) -> Vec<ViewId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|n| n.captured.contains(&pointer)))
            .collect()
    }

    fn pointer_context(&self, id: ViewId, event: &PointerEvent) -> PointerContext {
        let rect = self.absolute_rect(id);
        PointerContext {
            rect,
            screen_size: self.screen_size(),
            inside: rect.contains(event.position),
        }
    }

    fn pointer_down_at(&mut self, id: ViewId, event: &PointerEvent) -> bool {
        let Some(node) = self.get(id) else { return false };
        if !node.is_visible() || !node.user_interaction() {
            return false;
        }
        let ctx = self.pointer_context(id, event);
        if !ctx.inside {
            return false;
        }

        if let Some(node) = self.raw_mut(id) {
            if !node.captured.contains(&event.id) {
                node.captured.push(event.id);
            }
            if let Some(content) = node.content.as_deref_mut() {
                content.pointer_down(&ctx, event);
            }
        }
        self.scroll_pointer_down(id, event);

        let children = self.children(id).to_vec();
        let consumed_below = children
            .into_iter()
            .rev()
            .any(|child| self.pointer_down_at(child, event));

        let Some(node) = self.get(id) else { return consumed_below };
        node.events.pointer_down.notify(event);
        consumed_below || node.consumes_touches()
    }

    fn route_captured(&mut self, event: &PointerEvent, phase: Phase) {
        for id in self.captured_by(event.id) {
            let ctx = self.pointer_context(id, event);
            if let Some(node) = self.raw_mut(id) {
                if matches!(phase, Phase::Up) {
                    node.captured.retain(|p| *p != event.id);
                }
                if let Some(content) = node.content.as_deref_mut() {
                    match phase {
                        Phase::Moved => content.pointer_moved(&ctx, event),
                        Phase::Up => content.pointer_up(&ctx, event),
                    }
                }
            }
            match phase {
                Phase::Moved => self.scroll_pointer_moved(id, event, ctx.inside),
                Phase::Up => self.scroll_pointer_up(id),
            }
            if let Some(node) = self.get(id) {
                match phase {
                    Phase::Moved => node.events.pointer_moved.notify(event),
                    Phase::Up => node.events.pointer_up.notify(event),
                }
            }
        }
    }
}
