//! Pointer input delivered to the view tree.
//!
//! Platform backends translate mouse and touch events into [`PointerEvent`]s;
//! the UI crate routes them by hit-testing.

mod pointer;

pub use pointer::{MouseButton, PointerEvent, PointerId, PointerInput};
