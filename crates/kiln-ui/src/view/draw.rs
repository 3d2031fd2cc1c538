use kiln_engine::canvas::Canvas;

use crate::content::DrawContext;
use crate::layout::LayoutPolicy;

use super::{ViewId, ViewTree};

impl ViewTree {
    /// Paints the tree in pre-order: a parent under its children, siblings in
    /// insertion order.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.draw_node(self.root(), canvas);
    }

    fn draw_node(&mut self, id: ViewId, canvas: &mut dyn Canvas) {
        let Some(node) = self.get(id) else { return };
        if !node.is_visible() {
            return;
        }
        let culls = node.clip_offscreen() || matches!(node.layout_policy(), Some(LayoutPolicy::VerticalList(_)));
        let clips = node.clip_subviews();
        if culls && self.is_offscreen(id) {
            return;
        }

        let rect = self.absolute_rect(id);
        if rect.is_finite() {
            let ctx = DrawContext {
                rect,
                colour: self.absolute_colour(id),
                scale: self.absolute_scale(id),
            };
            if let Some(content) = self.raw_mut(id).and_then(|n| n.content.as_deref_mut()) {
                content.draw(canvas, &ctx);
            }
        } else {
            log::debug!("draw: skipping content of {id:?} with degenerate rect {rect:?}");
        }

        if clips {
            canvas.push_clip_bounds(rect);
        }
        for child in self.children(id).to_vec() {
            self.draw_node(child, canvas);
        }
        if clips {
            canvas.pop_clip_bounds();
        }
    }
}
