//! Kiln engine crate.
//!
//! Geometry, logging, parameter dictionaries, the canvas contract used by the
//! view layer, pointer input types, render-target management and particles.

pub mod canvas;
pub mod config;
pub mod coords;
pub mod input;
pub mod logging;
pub mod particles;
pub mod render;
