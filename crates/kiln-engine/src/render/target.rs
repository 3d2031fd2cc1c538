use super::{
    Attachment, FrameBufferError, FrameBufferHandle, GraphicsApi, RenderBufferFormat,
    RenderBufferHandle, TextureHandle,
};

/// An off-screen frame buffer plus any render buffers it created itself.
///
/// Targets hold GPU objects and must be returned through
/// [`RenderTargetBinder::destroy`].
#[derive(Debug)]
#[must_use]
pub struct RenderTarget {
    frame_buffer: Option<FrameBufferHandle>,
    colour_buffer: Option<RenderBufferHandle>,
    depth_buffer: Option<RenderBufferHandle>,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_buffer(&self) -> Option<FrameBufferHandle> {
        self.frame_buffer
    }

    pub fn colour_buffer(&self) -> Option<RenderBufferHandle> {
        self.colour_buffer
    }

    pub fn depth_buffer(&self) -> Option<RenderBufferHandle> {
        self.depth_buffer
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        if let Some(fb) = self.frame_buffer {
            log::warn!("render target {fb:?} dropped without destroy; GPU objects leak");
        }
    }
}

/// Last-bound handles, used to skip redundant binds.
///
/// `None` means unknown: the next bind always reaches the API.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderTargetState {
    pub bound_frame_buffer: Option<FrameBufferHandle>,
    pub bound_render_buffer: Option<RenderBufferHandle>,
    /// Frame buffer of the target last bound through [`RenderTargetBinder::bind`].
    pub bound_target: Option<FrameBufferHandle>,
}

/// Creates, binds and destroys render targets over a [`GraphicsApi`].
#[derive(Debug)]
pub struct RenderTargetBinder<G: GraphicsApi> {
    api: G,
    state: RenderTargetState,
}

impl<G: GraphicsApi> RenderTargetBinder<G> {
    pub fn new(api: G) -> Self {
        Self {
            api,
            state: RenderTargetState::default(),
        }
    }

    pub fn api(&self) -> &G {
        &self.api
    }

    /// Direct API access. Binding through it desynchronizes the cache; call
    /// [`clear_cache`](Self::clear_cache) afterwards.
    pub fn api_mut(&mut self) -> &mut G {
        &mut self.api
    }

    pub fn state(&self) -> RenderTargetState {
        self.state
    }

    /// Forgets every cached binding, e.g. after the graphics context was lost.
    pub fn clear_cache(&mut self) {
        self.state = RenderTargetState::default();
    }

    // ── cached primitives ─────────────────────────────────────────────────

    /// Binding another target's frame buffer also unsets `bound_target`, so
    /// the next [`bind`](Self::bind) of that target is not skipped.
    fn bind_frame_buffer(&mut self, fb: FrameBufferHandle) {
        if self.state.bound_frame_buffer != Some(fb) {
            self.api.bind_frame_buffer(fb);
            self.state.bound_frame_buffer = Some(fb);
        }
        if self.state.bound_target != Some(fb) {
            self.state.bound_target = None;
        }
    }

    fn bind_render_buffer(&mut self, rb: RenderBufferHandle) {
        if self.state.bound_render_buffer != Some(rb) {
            self.api.bind_render_buffer(rb);
            self.state.bound_render_buffer = Some(rb);
        }
    }

    fn create_render_buffer(&mut self) -> RenderBufferHandle {
        let rb = self.api.create_render_buffer();
        self.bind_render_buffer(rb);
        rb
    }

    fn delete_render_buffer(&mut self, slot: &mut Option<RenderBufferHandle>) {
        if let Some(rb) = slot.take() {
            if self.state.bound_render_buffer == Some(rb) {
                self.state.bound_render_buffer = None;
            }
            self.api.delete_render_buffer(rb);
        }
    }

    fn delete_frame_buffer(&mut self, slot: &mut Option<FrameBufferHandle>) {
        if let Some(fb) = slot.take() {
            if self.state.bound_frame_buffer == Some(fb) {
                self.state.bound_frame_buffer = None;
            }
            if self.state.bound_target == Some(fb) {
                self.state.bound_target = None;
            }
            self.api.delete_frame_buffer(fb);
        }
    }

    // ── targets ───────────────────────────────────────────────────────────

    /// Creates a `width` x `height` target and binds its frame buffer.
    pub fn create_target(&mut self, width: u32, height: u32) -> RenderTarget {
        let fb = self.api.create_frame_buffer();
        self.bind_frame_buffer(fb);
        RenderTarget {
            frame_buffer: Some(fb),
            colour_buffer: None,
            depth_buffer: None,
            width,
            height,
        }
    }

    /// Makes `target` current and sets the viewport to its size.
    pub fn bind(&mut self, target: &RenderTarget) {
        let Some(fb) = target.frame_buffer else {
            log::warn!("bind: render target has no frame buffer");
            return;
        };
        if self.state.bound_target == Some(fb) {
            return;
        }
        self.bind_frame_buffer(fb);
        self.api.set_viewport(target.width, target.height);
        self.state.bound_target = Some(fb);
    }

    pub fn is_bound(&self, target: &RenderTarget) -> bool {
        target.frame_buffer.is_some() && self.state.bound_target == target.frame_buffer
    }

    /// Attaches textures to `target`, replacing any internal render buffers.
    ///
    /// A missing colour texture gets an internal RGB render buffer when the
    /// API requires one; a missing depth texture always gets a 16-bit depth
    /// render buffer.
    pub fn set_target_textures(
        &mut self,
        target: &mut RenderTarget,
        colour: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    ) {
        let Some(fb) = target.frame_buffer else {
            log::warn!("set_target_textures: render target has no frame buffer");
            return;
        };

        self.delete_render_buffer(&mut target.colour_buffer);
        self.delete_render_buffer(&mut target.depth_buffer);
        self.bind_frame_buffer(fb);

        match colour {
            Some(texture) => self.api.attach_texture(Attachment::Colour, texture),
            None if self.api.requires_colour_buffer() => {
                let rb = self.create_and_attach(fb, target, Attachment::Colour, RenderBufferFormat::Rgb8);
                target.colour_buffer = Some(rb);
                if !self.attachment_ok() {
                    log::error!("failed to attach colour buffer to render target");
                }
            }
            None => {}
        }

        match depth {
            Some(texture) => self.api.attach_texture(Attachment::Depth, texture),
            None => {
                let rb = self.create_and_attach(fb, target, Attachment::Depth, RenderBufferFormat::Depth16);
                target.depth_buffer = Some(rb);
                if !self.attachment_ok() {
                    log::error!("failed to attach depth buffer to render target");
                }
            }
        }

        if cfg!(debug_assertions) {
            if let Err(err) = self.api.check_frame_buffer_status() {
                log::error!("render target frame buffer: {err}");
            }
        }
    }

    fn create_and_attach(
        &mut self,
        fb: FrameBufferHandle,
        target: &RenderTarget,
        attachment: Attachment,
        format: RenderBufferFormat,
    ) -> RenderBufferHandle {
        self.bind_frame_buffer(fb);
        let rb = self.create_render_buffer();
        self.api.render_buffer_storage(format, target.width, target.height);
        self.api.attach_render_buffer(attachment, rb);
        rb
    }

    /// Completeness is only queried in debug builds.
    fn attachment_ok(&self) -> bool {
        !cfg!(debug_assertions) || self.api.check_frame_buffer_status().is_ok()
    }

    /// Queries completeness of `target` regardless of build profile.
    pub fn check_status(&mut self, target: &RenderTarget) -> Result<(), FrameBufferError> {
        let fb = target.frame_buffer.ok_or(FrameBufferError::NotBound)?;
        self.bind_frame_buffer(fb);
        self.api.check_frame_buffer_status()
    }

    /// Hints that `target`'s contents need not be preserved.
    pub fn discard(&mut self, target: &RenderTarget) {
        if !self.api.supports_discard() {
            return;
        }
        if let Some(fb) = target.frame_buffer {
            self.bind_frame_buffer(fb);
            self.api.discard(&[Attachment::Colour, Attachment::Depth]);
        }
    }

    /// Releases `target`'s GPU objects, restoring the default frame buffer
    /// when it was current.
    pub fn destroy(&mut self, mut target: RenderTarget) {
        if target.frame_buffer.is_none() {
            return;
        }

        self.bind(&target);
        self.delete_render_buffer(&mut target.colour_buffer);
        self.delete_render_buffer(&mut target.depth_buffer);

        if self.is_bound(&target) {
            self.api.bind_default_frame_buffer();
            self.state.bound_frame_buffer = Some(FrameBufferHandle::DEFAULT);
            self.state.bound_target = None;
        }

        self.delete_frame_buffer(&mut target.frame_buffer);
    }
}
