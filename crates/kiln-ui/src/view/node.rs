use std::cell::Cell;
use std::fmt;

use kiln_engine::coords::{AlignmentAnchor, ColorRgba, UnifiedVec2, Vec2};
use kiln_engine::input::{PointerEvent, PointerId};

use crate::content::Content;
use crate::event::Event;
use crate::layout::{LayoutPolicy, SizePolicy};

use super::{Dirty, ViewId};

/// Pointer notifications raised by a view that was hit (down) or that holds
/// the pointer (moved, up).
#[derive(Debug, Default)]
pub struct ViewEvents {
    pub pointer_down: Event<PointerEvent>,
    pub pointer_moved: Event<PointerEvent>,
    pub pointer_up: Event<PointerEvent>,
}

/// Memoized absolute values, valid while the matching [`Dirty`] bit is clear.
#[derive(Debug)]
pub(crate) struct Cache {
    pub size: Cell<Vec2>,
    pub position: Cell<Vec2>,
    pub scale: Cell<Vec2>,
    pub colour: Cell<ColorRgba>,
    pub dirty: Cell<Dirty>,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            size: Cell::new(Vec2::zero()),
            position: Cell::new(Vec2::zero()),
            scale: Cell::new(Vec2::one()),
            colour: Cell::new(ColorRgba::white()),
            dirty: Cell::new(Dirty::all()),
        }
    }
}

impl Cache {
    pub fn is_dirty(&self, flag: Dirty) -> bool {
        self.dirty.get().intersects(flag)
    }

    pub fn mark(&self, flags: Dirty) {
        self.dirty.set(self.dirty.get() | flags);
    }

    pub fn clean(&self, flags: Dirty) {
        self.dirty.set(self.dirty.get() - flags);
    }
}

/// A rectangle in the hierarchy, positioned and sized in unified coordinates.
pub struct ViewNode {
    pub(crate) name: String,
    pub(crate) unified_size: UnifiedVec2,
    pub(crate) unified_position: UnifiedVec2,
    pub(crate) local_alignment: AlignmentAnchor,
    pub(crate) parent_alignment: AlignmentAnchor,
    pub(crate) align_to_parent: bool,
    pub(crate) visible: bool,
    pub(crate) user_interaction: bool,
    pub(crate) consumes_touches: bool,
    pub(crate) clip_subviews: bool,
    pub(crate) clip_offscreen: bool,
    pub(crate) scale: Vec2,
    pub(crate) colour: ColorRgba,
    pub(crate) inherit_colour: bool,

    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,

    pub(crate) content: Option<Box<dyn Content>>,
    pub(crate) size_policy: SizePolicy,
    pub(crate) layout_policy: Option<LayoutPolicy>,

    pub events: ViewEvents,

    /// Pointers pressed inside this view and not yet released.
    pub(crate) captured: Vec<PointerId>,
    pub(crate) cache: Cache,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            unified_size: UnifiedVec2::zero(),
            unified_position: UnifiedVec2::zero(),
            local_alignment: AlignmentAnchor::MiddleCentre,
            parent_alignment: AlignmentAnchor::MiddleCentre,
            align_to_parent: true,
            visible: true,
            user_interaction: true,
            consumes_touches: true,
            clip_subviews: false,
            clip_offscreen: false,
            scale: Vec2::one(),
            colour: ColorRgba::white(),
            inherit_colour: true,
            parent: None,
            children: Vec::new(),
            content: None,
            size_policy: SizePolicy::Fixed,
            layout_policy: None,
            events: ViewEvents::default(),
            captured: Vec::new(),
            cache: Cache::default(),
        }
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("name", &self.name)
            .field("unified_size", &self.unified_size)
            .field("unified_position", &self.unified_position)
            .field("content", &self.content.as_ref().map(|c| c.kind()))
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl ViewNode {
    pub fn new() -> Self {
        Self::default()
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_size(mut self, size: UnifiedVec2) -> Self {
        self.unified_size = size;
        self
    }

    pub fn with_position(mut self, position: UnifiedVec2) -> Self {
        self.unified_position = position;
        self
    }

    /// Sets both the local and parent alignment.
    pub fn anchored(mut self, anchor: AlignmentAnchor) -> Self {
        self.local_alignment = anchor;
        self.parent_alignment = anchor;
        self
    }

    pub fn with_colour(mut self, colour: ColorRgba) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_content(mut self, content: impl Content) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = policy;
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn unified_size(&self) -> UnifiedVec2 {
        self.unified_size
    }

    pub fn set_unified_size(&mut self, size: UnifiedVec2) {
        self.unified_size = size;
    }

    pub fn unified_position(&self) -> UnifiedVec2 {
        self.unified_position
    }

    pub fn set_unified_position(&mut self, position: UnifiedVec2) {
        self.unified_position = position;
    }

    pub fn local_alignment(&self) -> AlignmentAnchor {
        self.local_alignment
    }

    pub fn set_local_alignment(&mut self, anchor: AlignmentAnchor) {
        self.local_alignment = anchor;
    }

    pub fn parent_alignment(&self) -> AlignmentAnchor {
        self.parent_alignment
    }

    pub fn set_parent_alignment(&mut self, anchor: AlignmentAnchor) {
        self.parent_alignment = anchor;
    }

    pub fn align_to_parent(&self) -> bool {
        self.align_to_parent
    }

    pub fn set_align_to_parent(&mut self, on: bool) {
        self.align_to_parent = on;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, on: bool) {
        self.visible = on;
    }

    pub fn user_interaction(&self) -> bool {
        self.user_interaction
    }

    pub fn set_user_interaction(&mut self, on: bool) {
        self.user_interaction = on;
    }

    pub fn consumes_touches(&self) -> bool {
        self.consumes_touches
    }

    pub fn set_consumes_touches(&mut self, on: bool) {
        self.consumes_touches = on;
    }

    pub fn clip_subviews(&self) -> bool {
        self.clip_subviews
    }

    pub fn set_clip_subviews(&mut self, on: bool) {
        self.clip_subviews = on;
    }

    pub fn clip_offscreen(&self) -> bool {
        self.clip_offscreen
    }

    pub fn set_clip_offscreen(&mut self, on: bool) {
        self.clip_offscreen = on;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub fn colour(&self) -> ColorRgba {
        self.colour
    }

    pub fn set_colour(&mut self, colour: ColorRgba) {
        self.colour = colour;
    }

    pub fn inherit_colour(&self) -> bool {
        self.inherit_colour
    }

    pub fn set_inherit_colour(&mut self, on: bool) {
        self.inherit_colour = on;
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn content(&self) -> Option<&dyn Content> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: Option<Box<dyn Content>>) {
        self.content = content;
        self.cache.mark(Dirty::CONTENT);
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.size_policy
    }

    pub fn set_size_policy(&mut self, policy: SizePolicy) {
        self.size_policy = policy;
    }

    pub fn layout_policy(&self) -> Option<&LayoutPolicy> {
        self.layout_policy.as_ref()
    }

    pub fn dirty(&self) -> Dirty {
        self.cache.dirty.get()
    }
}
