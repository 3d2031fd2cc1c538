use super::FrameBufferError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameBufferHandle(pub u32);

impl FrameBufferHandle {
    /// The window's own frame buffer.
    pub const DEFAULT: FrameBufferHandle = FrameBufferHandle(0);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderBufferHandle(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attachment {
    Colour,
    Depth,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RenderBufferFormat {
    Rgb8,
    Depth16,
}

/// The slice of a graphics API that render targets need.
///
/// Calls follow bind-to-edit semantics: storage allocation targets the bound
/// render buffer, attachments and status checks target the bound frame
/// buffer. Callers are expected to go through [`RenderTargetBinder`], which
/// keeps the bind cache consistent.
///
/// [`RenderTargetBinder`]: super::RenderTargetBinder
pub trait GraphicsApi {
    fn create_frame_buffer(&mut self) -> FrameBufferHandle;
    fn bind_frame_buffer(&mut self, frame_buffer: FrameBufferHandle);
    fn delete_frame_buffer(&mut self, frame_buffer: FrameBufferHandle);

    fn bind_default_frame_buffer(&mut self) {
        self.bind_frame_buffer(FrameBufferHandle::DEFAULT);
    }

    fn create_render_buffer(&mut self) -> RenderBufferHandle;
    fn bind_render_buffer(&mut self, render_buffer: RenderBufferHandle);
    fn delete_render_buffer(&mut self, render_buffer: RenderBufferHandle);
    fn render_buffer_storage(&mut self, format: RenderBufferFormat, width: u32, height: u32);

    fn attach_texture(&mut self, attachment: Attachment, texture: TextureHandle);
    fn attach_render_buffer(&mut self, attachment: Attachment, render_buffer: RenderBufferHandle);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn check_frame_buffer_status(&self) -> Result<(), FrameBufferError>;

    /// Whether a frame buffer without a colour texture still needs a colour
    /// render buffer to be complete.
    fn requires_colour_buffer(&self) -> bool;

    fn supports_discard(&self) -> bool {
        false
    }

    /// Hints that the contents of `attachments` need not be preserved.
    fn discard(&mut self, _attachments: &[Attachment]) {}
}
