use super::{
    Attachment, FrameBufferError, FrameBufferHandle, GraphicsApi, RenderBufferFormat,
    RenderBufferHandle, TextureHandle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateFrameBuffer(FrameBufferHandle),
    BindFrameBuffer(FrameBufferHandle),
    BindDefault,
    DeleteFrameBuffer(FrameBufferHandle),
    CreateRenderBuffer(RenderBufferHandle),
    BindRenderBuffer(RenderBufferHandle),
    DeleteRenderBuffer(RenderBufferHandle),
    Storage(RenderBufferFormat, u32, u32),
    AttachTexture(Attachment, TextureHandle),
    AttachRenderBuffer(Attachment, RenderBufferHandle),
    SetViewport(u32, u32),
    Discard,
}

/// Graphics API double that records every call.
#[derive(Debug)]
pub struct RecordingGraphics {
    pub calls: Vec<Call>,
    pub colour_buffer_required: bool,
    pub discard_supported: bool,
    pub status: Result<(), FrameBufferError>,
    next: u32,
}

impl Default for RecordingGraphics {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            colour_buffer_required: false,
            discard_supported: false,
            status: Ok(()),
            next: 1,
        }
    }
}

impl RecordingGraphics {
    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl GraphicsApi for RecordingGraphics {
    fn create_frame_buffer(&mut self) -> FrameBufferHandle {
        let fb = FrameBufferHandle(self.next_id());
        self.calls.push(Call::CreateFrameBuffer(fb));
        fb
    }

    fn bind_frame_buffer(&mut self, fb: FrameBufferHandle) {
        self.calls.push(Call::BindFrameBuffer(fb));
    }

    fn bind_default_frame_buffer(&mut self) {
        self.calls.push(Call::BindDefault);
    }

    fn delete_frame_buffer(&mut self, fb: FrameBufferHandle) {
        self.calls.push(Call::DeleteFrameBuffer(fb));
    }

    fn create_render_buffer(&mut self) -> RenderBufferHandle {
        let rb = RenderBufferHandle(self.next_id());
        self.calls.push(Call::CreateRenderBuffer(rb));
        rb
    }

    fn bind_render_buffer(&mut self, rb: RenderBufferHandle) {
        self.calls.push(Call::BindRenderBuffer(rb));
    }

    fn delete_render_buffer(&mut self, rb: RenderBufferHandle) {
        self.calls.push(Call::DeleteRenderBuffer(rb));
    }

    fn render_buffer_storage(&mut self, format: RenderBufferFormat, width: u32, height: u32) {
        self.calls.push(Call::Storage(format, width, height));
    }

    fn attach_texture(&mut self, attachment: Attachment, texture: TextureHandle) {
        self.calls.push(Call::AttachTexture(attachment, texture));
    }

    fn attach_render_buffer(&mut self, attachment: Attachment, rb: RenderBufferHandle) {
        self.calls.push(Call::AttachRenderBuffer(attachment, rb));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::SetViewport(width, height));
    }

    fn check_frame_buffer_status(&self) -> Result<(), FrameBufferError> {
        self.status.clone()
    }

    fn requires_colour_buffer(&self) -> bool {
        self.colour_buffer_required
    }

    fn supports_discard(&self) -> bool {
        self.discard_supported
    }

    fn discard(&mut self, _attachments: &[Attachment]) {
        self.calls.push(Call::Discard);
    }
}
