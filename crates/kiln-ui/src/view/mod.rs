//! The view hierarchy.
//!
//! [`ViewTree`] is an arena owning every [`ViewNode`]. Geometry is resolved
//! lazily from unified coordinates and cached per node; any mutation marks
//! the node and its descendants dirty so reads never observe stale values.

mod dirty;
mod draw;
mod geometry;
mod id;
mod input;
mod node;
mod tree;

pub use dirty::Dirty;
pub use id::ViewId;
pub use node::{ViewEvents, ViewNode};
pub use tree::ViewTree;
