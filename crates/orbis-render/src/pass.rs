//! Per-frame command encoding.

/// Owns the acquired surface texture and the frame's command encoder.
/// Scene passes target any view; the surface view is handed out with the
/// encoder for the final screen-space pass. [`FrameEncoder::present`]
/// submits and presents in one step.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder,
            surface_texture,
            view,
        }
    }

    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder<'a>,
        target: &'a wgpu::TextureView,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, target)
    }

    pub fn encoder_and_surface(&mut self) -> (&mut wgpu::CommandEncoder, &wgpu::TextureView) {
        (&mut self.encoder, &self.view)
    }

    pub fn present(self, queue: &wgpu::Queue) {
        queue.submit(std::iter::once(self.encoder.finish()));
        self.surface_texture.present();
    }
}

/// Clear colour plus an optional depth attachment.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth: Option<(&'a wgpu::TextureView, f32)>,
    label: Option<&'static str>,
}

impl<'a> RenderPassBuilder<'a> {
    pub fn new(clear_color: wgpu::Color) -> Self {
        Self {
            clear_color,
            depth: None,
            label: None,
        }
    }

    pub fn depth(mut self, view: &'a wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some((view, clear_value));
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(&'e self, encoder: &'e mut wgpu::CommandEncoder, view: &'e wgpu::TextureView) -> wgpu::RenderPass<'e> {
        let color = wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };
        let depth_stencil_attachment = self.depth.map(|(view, clear)| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Linear RGBA from config into a wgpu clear colour.
pub fn clear_color(rgba: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}
