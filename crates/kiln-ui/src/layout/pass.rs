use kiln_engine::canvas::Canvas;

use crate::view::{Dirty, ViewTree};

use super::LayoutPolicy;

impl ViewTree {
    /// Runs one layout pass over the whole tree.
    ///
    /// Size policies go first, top-down, so every container's size is final
    /// before its list arranges the children. Lists whose bounds are off the
    /// screen are skipped. Degenerate geometry is carried through, never
    /// rejected.
    pub fn layout(&mut self, canvas: &mut dyn Canvas) {
        let order = self.descendants(self.root());

        // ── sizing ────────────────────────────────────────────────────────
        for &id in &order {
            self.layout_size(id, canvas);
        }

        // ── containers ────────────────────────────────────────────────────
        for &id in &order {
            let Some(LayoutPolicy::VerticalList(list)) = self.get(id).and_then(|n| n.layout_policy().copied()) else {
                continue;
            };
            if self.is_offscreen(id) {
                log::debug!("layout: skipping offscreen list {:?}", self.get(id).map(|n| n.name()));
                continue;
            }
            self.arrange_vertical_list(id, list);
        }

        for &id in &order {
            if let Some(node) = self.get(id) {
                node.cache.clean(Dirty::CONTENT | Dirty::LAYOUT);
            }
        }
    }
}
