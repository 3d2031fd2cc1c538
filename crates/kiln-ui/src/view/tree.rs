use kiln_engine::coords::{AlignmentAnchor, UnifiedVec2, Vec2};

use crate::content::Content;
use crate::layout::LayoutPolicy;

use super::{Dirty, ViewId, ViewNode};

struct Slot {
    generation: u32,
    node: Option<ViewNode>,
}

/// Arena owning the view hierarchy.
///
/// The tree always has a root filling the screen. Removing a node removes
/// its whole subtree.
pub struct ViewTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ViewId,
    screen_size: Vec2,
}

impl ViewTree {
    pub fn new(screen_size: Vec2) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: ViewId::new(0, 0),
            screen_size,
        };
        let mut root = ViewNode::new()
            .named("root")
            .with_size(UnifiedVec2::relative(1.0, 1.0))
            .anchored(AlignmentAnchor::BottomLeft);
        // Touches on bare screen fall through to whatever sits behind the UI.
        root.set_consumes_touches(false);
        tree.root = tree.alloc(root);
        tree
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn set_screen_size(&mut self, size: Vec2) {
        if self.screen_size != size {
            self.screen_size = size;
            self.invalidate_subtree(self.root, Dirty::GEOMETRY);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── arena ─────────────────────────────────────────────────────────────

    fn alloc(&mut self, node: ViewNode) -> ViewId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            ViewId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(node) });
            ViewId::new(index, 0)
        }
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    /// Mutable access to a node. Its subtree's cached geometry is invalidated.
    pub fn node_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        if !self.contains(id) {
            return None;
        }
        self.invalidate_subtree(id, Dirty::GEOMETRY);
        self.raw_mut(id)
    }

    /// Mutable access without invalidation, for internal bookkeeping
    /// (capture lists, policy state) that does not affect geometry.
    pub(crate) fn raw_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub(crate) fn invalidate_subtree(&self, id: ViewId, flags: Dirty) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                node.cache.mark(flags);
                stack.extend_from_slice(&node.children);
            }
        }
    }

    // ── hierarchy ─────────────────────────────────────────────────────────

    /// Adds `node` as the last child of `parent`.
    ///
    /// Children added to a scroll view land in its content node. Returns
    /// `None` when `parent` is not in the tree.
    pub fn insert(&mut self, parent: ViewId, mut node: ViewNode) -> Option<ViewId> {
        let parent = self.content_parent(parent);
        if !self.contains(parent) {
            log::warn!("insert: parent {parent:?} is not in the tree");
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        node.cache = Default::default();
        let id = self.alloc(node);
        if let Some(p) = self.raw_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    fn content_parent(&self, parent: ViewId) -> ViewId {
        match self.get(parent).and_then(|n| n.layout_policy.as_ref()) {
            Some(LayoutPolicy::Scroll(scroll)) => scroll.content,
            _ => parent,
        }
    }

    /// Removes `id` and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: ViewId) -> Option<ViewNode> {
        if id == self.root || !self.contains(id) {
            return None;
        }

        let parent = self.get(id).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.raw_mut(p)) {
            p.children.retain(|c| *c != id);
        }

        let mut removed = None;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            let Some(mut node) = slot.node.take() else { continue };
            self.free.push(current.index);
            stack.extend_from_slice(&node.children);
            if current == id {
                node.parent = None;
                node.children.clear();
                removed = Some(node);
            }
        }
        removed
    }

    /// Moves `id` (with its subtree) to the end of `new_parent`'s children.
    /// Fails for the root, for missing nodes, and when `new_parent` lies
    /// inside `id`'s subtree.
    pub fn reparent(&mut self, id: ViewId, new_parent: ViewId) -> bool {
        if id == self.root || !self.contains(id) || !self.contains(new_parent) {
            return false;
        }
        let mut ancestors = std::iter::successors(Some(new_parent), |p| self.parent(*p));
        if ancestors.any(|a| a == id) {
            return false;
        }

        if let Some(p) = self.parent(id).and_then(|p| self.raw_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        if let Some(p) = self.raw_mut(new_parent) {
            p.children.push(id);
        }
        if let Some(node) = self.raw_mut(id) {
            node.parent = Some(new_parent);
        }
        self.invalidate_subtree(id, Dirty::GEOMETRY);
        true
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// `id` and every descendant in depth-first pre-order.
    pub fn descendants(&self, id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn depth(&self, id: ViewId) -> usize {
        std::iter::successors(self.parent(id), |p| self.parent(*p)).count()
    }

    /// First node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|n| n.name == name))
    }

    // ── content ───────────────────────────────────────────────────────────

    pub fn content<T: Content>(&self, id: ViewId) -> Option<&T> {
        self.get(id)?.content.as_deref()?.as_any().downcast_ref()
    }

    /// Typed content access. The node is marked for re-measurement.
    pub fn content_mut<T: Content>(&mut self, id: ViewId) -> Option<&mut T> {
        if self.get(id)?.content.is_none() {
            return None;
        }
        self.invalidate_subtree(id, Dirty::GEOMETRY);
        let node = self.raw_mut(id)?;
        node.cache.mark(Dirty::CONTENT);
        node.content.as_deref_mut()?.as_any_mut().downcast_mut()
    }

    pub fn set_content(&mut self, id: ViewId, content: impl Content) {
        if let Some(node) = self.node_mut(id) {
            node.set_content(Some(Box::new(content)));
        }
    }

    // ── internal setters ──────────────────────────────────────────────────

    pub(crate) fn set_unified_size(&mut self, id: ViewId, size: UnifiedVec2) {
        if self.get(id).is_some_and(|n| n.unified_size != size) {
            if let Some(node) = self.node_mut(id) {
                node.unified_size = size;
            }
        }
    }

    pub(crate) fn set_unified_position(&mut self, id: ViewId, position: UnifiedVec2) {
        if self.get(id).is_some_and(|n| n.unified_position != position) {
            if let Some(node) = self.node_mut(id) {
                node.unified_position = position;
            }
        }
    }
}
