use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::coords::ColorRgba;

use super::{
    Attachment, FrameBufferError, FrameBufferHandle, GraphicsApi, RenderBufferFormat,
    RenderBufferHandle, TextureHandle,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Source {
    Texture(TextureHandle),
    RenderBuffer(RenderBufferHandle),
}

/// Attachment set standing in for a GL frame buffer object.
#[derive(Debug, Default)]
struct FrameBuffer {
    colour: Option<Source>,
    depth: Option<Source>,
}

/// [`GraphicsApi`] over `wgpu`.
///
/// wgpu has no frame buffer objects; a frame buffer here is a named set of
/// attachments and binding one selects the views that subsequent render
/// passes draw into (see [`WgpuGraphics::bound_views`]).
pub struct WgpuGraphics {
    device: wgpu::Device,
    queue: wgpu::Queue,

    textures: HashMap<u32, wgpu::Texture>,
    frame_buffers: HashMap<u32, FrameBuffer>,
    /// Storage is allocated lazily by `render_buffer_storage`.
    render_buffers: HashMap<u32, Option<wgpu::Texture>>,
    next_handle: u32,

    bound_frame_buffer: FrameBufferHandle,
    bound_render_buffer: Option<RenderBufferHandle>,
    viewport: (u32, u32),
}

impl WgpuGraphics {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            textures: HashMap::new(),
            frame_buffers: HashMap::new(),
            render_buffers: HashMap::new(),
            next_handle: 1,
            bound_frame_buffer: FrameBufferHandle::DEFAULT,
            bound_render_buffer: None,
            viewport: (0, 0),
        }
    }

    /// Acquires an adapter and device without a surface.
    pub fn headless() -> Result<Self> {
        pollster::block_on(Self::headless_async())
    }

    pub async fn headless_async() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("kiln-engine offscreen device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::info!("offscreen device on {}", adapter.get_info().name);
        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn next_handle(&mut self) -> u32 {
        let h = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        h
    }

    /// Makes an externally created texture attachable.
    pub fn register_texture(&mut self, texture: wgpu::Texture) -> TextureHandle {
        let h = self.next_handle();
        self.textures.insert(h, texture);
        TextureHandle(h)
    }

    /// Creates a texture usable both as a render attachment and for sampling.
    pub fn create_texture(&mut self, width: u32, height: u32, format: wgpu::TextureFormat) -> TextureHandle {
        let texture = self.allocate(width, height, format, Some("kiln render texture"));
        self.register_texture(texture)
    }

    pub fn release_texture(&mut self, texture: TextureHandle) {
        if let Some(t) = self.textures.remove(&texture.0) {
            t.destroy();
        }
    }

    fn allocate(&self, width: u32, height: u32, format: wgpu::TextureFormat, label: Option<&str>) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    }

    fn resolve(&self, source: Source) -> Option<&wgpu::Texture> {
        match source {
            Source::Texture(t) => self.textures.get(&t.0),
            Source::RenderBuffer(rb) => self.render_buffers.get(&rb.0).and_then(Option::as_ref),
        }
    }

    /// Colour and depth views of the bound frame buffer.
    ///
    /// `None` while the default frame buffer is bound; the surface owner
    /// supplies those views.
    pub fn bound_views(&self) -> Option<(Option<wgpu::TextureView>, Option<wgpu::TextureView>)> {
        let fb = self.frame_buffers.get(&self.bound_frame_buffer.0)?;
        let view = |s: Option<Source>| {
            s.and_then(|s| self.resolve(s))
                .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
        };
        Some((view(fb.colour), view(fb.depth)))
    }

    /// Clears the bound frame buffer's attachments, depth to 1.0.
    ///
    /// Returns `false` without touching the GPU when the default frame buffer
    /// is bound or the bound one is incomplete.
    pub fn clear_bound(&self, colour: ColorRgba) -> bool {
        if let Err(err) = self.check_frame_buffer_status() {
            log::error!("clear of incomplete frame buffer: {err}");
            return false;
        }
        let Some((colour_view, depth_view)) = self.bound_views() else {
            return false;
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("kiln clear encoder"),
        });
        {
            let colour_attachment = colour_view.as_ref().map(|view| wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: colour.r as f64,
                        g: colour.g as f64,
                        b: colour.b as f64,
                        a: colour.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            });
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("kiln clear pass"),
                color_attachments: &[colour_attachment],
                depth_stencil_attachment: depth_view.as_ref().map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        true
    }
}

impl GraphicsApi for WgpuGraphics {
    fn create_frame_buffer(&mut self) -> FrameBufferHandle {
        let h = self.next_handle();
        self.frame_buffers.insert(h, FrameBuffer::default());
        FrameBufferHandle(h)
    }

    fn bind_frame_buffer(&mut self, frame_buffer: FrameBufferHandle) {
        if frame_buffer != FrameBufferHandle::DEFAULT && !self.frame_buffers.contains_key(&frame_buffer.0) {
            log::error!("bind of unknown frame buffer {frame_buffer:?}");
            return;
        }
        self.bound_frame_buffer = frame_buffer;
    }

    fn delete_frame_buffer(&mut self, frame_buffer: FrameBufferHandle) {
        self.frame_buffers.remove(&frame_buffer.0);
        if self.bound_frame_buffer == frame_buffer {
            self.bound_frame_buffer = FrameBufferHandle::DEFAULT;
        }
    }

    fn create_render_buffer(&mut self) -> RenderBufferHandle {
        let h = self.next_handle();
        self.render_buffers.insert(h, None);
        RenderBufferHandle(h)
    }

    fn bind_render_buffer(&mut self, render_buffer: RenderBufferHandle) {
        self.bound_render_buffer = Some(render_buffer);
    }

    fn delete_render_buffer(&mut self, render_buffer: RenderBufferHandle) {
        if let Some(Some(t)) = self.render_buffers.remove(&render_buffer.0) {
            t.destroy();
        }
        if self.bound_render_buffer == Some(render_buffer) {
            self.bound_render_buffer = None;
        }
    }

    fn render_buffer_storage(&mut self, format: RenderBufferFormat, width: u32, height: u32) {
        let Some(rb) = self.bound_render_buffer else {
            log::error!("render_buffer_storage with no render buffer bound");
            return;
        };
        // wgpu has no 24-bit colour target; RGBA8 is the closest.
        let (format, label) = match format {
            RenderBufferFormat::Rgb8 => (wgpu::TextureFormat::Rgba8Unorm, "kiln colour buffer"),
            RenderBufferFormat::Depth16 => (wgpu::TextureFormat::Depth16Unorm, "kiln depth buffer"),
        };
        let texture = self.allocate(width, height, format, Some(label));
        if let Some(Some(old)) = self.render_buffers.insert(rb.0, Some(texture)) {
            old.destroy();
        }
    }

    fn attach_texture(&mut self, attachment: Attachment, texture: TextureHandle) {
        let fb = self.bound_frame_buffer;
        let Some(slots) = self.frame_buffers.get_mut(&fb.0) else {
            log::error!("attach_texture with no frame buffer bound");
            return;
        };
        match attachment {
            Attachment::Colour => slots.colour = Some(Source::Texture(texture)),
            Attachment::Depth => slots.depth = Some(Source::Texture(texture)),
        }
    }

    fn attach_render_buffer(&mut self, attachment: Attachment, render_buffer: RenderBufferHandle) {
        let fb = self.bound_frame_buffer;
        let Some(slots) = self.frame_buffers.get_mut(&fb.0) else {
            log::error!("attach_render_buffer with no frame buffer bound");
            return;
        };
        match attachment {
            Attachment::Colour => slots.colour = Some(Source::RenderBuffer(render_buffer)),
            Attachment::Depth => slots.depth = Some(Source::RenderBuffer(render_buffer)),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn check_frame_buffer_status(&self) -> Result<(), FrameBufferError> {
        if self.bound_frame_buffer == FrameBufferHandle::DEFAULT {
            return Ok(());
        }
        let fb = self
            .frame_buffers
            .get(&self.bound_frame_buffer.0)
            .ok_or(FrameBufferError::NotBound)?;

        if fb.colour.is_none() && fb.depth.is_none() {
            return Err(FrameBufferError::MissingAttachment);
        }

        let colour = fb.colour.map(|s| self.resolve(s).ok_or(FrameBufferError::IncompleteAttachment)).transpose()?;
        let depth = fb.depth.map(|s| self.resolve(s).ok_or(FrameBufferError::IncompleteAttachment)).transpose()?;

        if let Some(d) = depth {
            if !d.format().is_depth_stencil_format() {
                return Err(FrameBufferError::IncompleteAttachment);
            }
        }
        if let Some(c) = colour {
            if c.format().is_depth_stencil_format() {
                return Err(FrameBufferError::IncompleteAttachment);
            }
        }
        if let (Some(c), Some(d)) = (colour, depth) {
            if c.size() != d.size() {
                return Err(FrameBufferError::IncompleteDimensions);
            }
        }
        Ok(())
    }

    fn requires_colour_buffer(&self) -> bool {
        // Render pipelines here always write a colour target.
        true
    }
}
