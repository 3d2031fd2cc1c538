//! Off-screen render targets and frame-buffer binding.
//!
//! [`RenderTargetBinder`] owns a [`GraphicsApi`] and the bind cache that
//! avoids redundant frame-buffer and render-buffer binds. [`WgpuGraphics`]
//! is the engine's `wgpu` implementation of the API.

mod error;
mod graphics;
mod target;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use error::FrameBufferError;
pub use graphics::{
    Attachment, FrameBufferHandle, GraphicsApi, RenderBufferFormat, RenderBufferHandle,
    TextureHandle,
};
pub use target::{RenderTarget, RenderTargetBinder, RenderTargetState};
pub use wgpu_backend::WgpuGraphics;
