//! Bloom and vignette on the way from the HDR scene target to the surface.
//!
//! The scene renders into an `Rgba16Float` target. Bright pixels are
//! extracted into a half-resolution mip chain, blurred down it, summed back
//! up additively, then screen-blended over the scene in the composite pass,
//! which also applies the vignette and writes the surface.

use orbis_shading::{PostParams, PostUniform};
use wgpu::util::DeviceExt;

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Additive blend for the upsample pass.
const SUM: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

/// Sizes of the blur chain for a `width` x `height` scene: each level half
/// the one above, never below 1x1.
pub fn mip_chain_sizes(width: u32, height: u32, levels: u32) -> Vec<(u32, u32)> {
    let mut sizes = Vec::with_capacity(levels as usize);
    let mut w = (width / 2).max(1);
    let mut h = (height / 2).max(1);
    for _ in 0..levels {
        sizes.push((w, h));
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }
    sizes
}

/// A render target and the bind group that samples it.
struct Target {
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

pub struct PostProcess {
    params: PostParams,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    extract: wgpu::RenderPipeline,
    downsample: wgpu::RenderPipeline,
    upsample: wgpu::RenderPipeline,
    composite: wgpu::RenderPipeline,
    scene: Target,
    mips: Vec<Target>,
    size: (u32, u32),
}

impl PostProcess {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        params: PostParams,
    ) -> Self {
        let module = crate::shader::ShaderKind::Post.create_module(device);

        let uniform_layout = crate::pipeline::uniform_layout(device, "post-layout", std::mem::size_of::<PostUniform>());
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post-texture-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let chain_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post-chain-layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });
        let composite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post-composite-layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout, &texture_layout],
            immediate_size: 0,
        });

        let fullscreen = |layout: &wgpu::PipelineLayout,
                          entry: &str,
                          format: wgpu::TextureFormat,
                          blend: Option<wgpu::BlendState>,
                          label: &str| {
            create_fullscreen_pipeline(device, &module, layout, entry, format, blend, label)
        };
        let extract = fullscreen(&chain_layout, "fs_extract", HDR_FORMAT, None, "post-extract");
        let downsample = fullscreen(&chain_layout, "fs_downsample", HDR_FORMAT, None, "post-downsample");
        let upsample = fullscreen(&chain_layout, "fs_upsample", HDR_FORMAT, Some(SUM), "post-upsample");
        let composite = fullscreen(&composite_layout, "fs_composite", surface_format, None, "post-composite");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("post-uniform"),
            contents: bytemuck::bytes_of(&params.uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post-uniform"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        let scene = create_target(device, &texture_layout, &sampler, (width, height), "post-scene");
        let mips = create_mip_chain(device, &texture_layout, &sampler, width, height, params.bloom_levels);

        Self {
            params,
            texture_layout,
            sampler,
            uniform,
            uniform_bind_group,
            extract,
            downsample,
            upsample,
            composite,
            scene,
            mips,
            size: (width, height),
        }
    }

    /// Where the scene pass renders.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.scene.view
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.size = (width, height);
        self.scene = create_target(device, &self.texture_layout, &self.sampler, self.size, "post-scene");
        self.mips = create_mip_chain(
            device,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
            self.params.bloom_levels,
        );
    }

    /// New bloom and vignette settings; the chain is rebuilt if its depth
    /// changed.
    pub fn set_params(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, params: PostParams) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&params.uniform()));
        let rebuild = params.bloom_levels != self.params.bloom_levels;
        self.params = params;
        if rebuild {
            let (width, height) = self.size;
            self.mips = create_mip_chain(device, &self.texture_layout, &self.sampler, width, height, params.bloom_levels);
        }
    }

    /// Extract, blur down, sum back up, then composite onto `surface_view`.
    pub fn execute(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let clear = wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT);
        let Some(first) = self.mips.first() else {
            return;
        };

        self.run_pass(encoder, &self.extract, &[&self.scene.bind_group], &first.view, clear, "post-extract");

        for pair in self.mips.windows(2) {
            self.run_pass(
                encoder,
                &self.downsample,
                &[&pair[0].bind_group],
                &pair[1].view,
                clear,
                "post-downsample",
            );
        }

        for pair in self.mips.windows(2).rev() {
            self.run_pass(
                encoder,
                &self.upsample,
                &[&pair[1].bind_group],
                &pair[0].view,
                wgpu::LoadOp::Load,
                "post-upsample",
            );
        }

        self.run_pass(
            encoder,
            &self.composite,
            &[&self.scene.bind_group, &first.bind_group],
            surface_view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            "post-composite",
        );
    }

    fn run_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::RenderPipeline,
        textures: &[&wgpu::BindGroup],
        target_view: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
        label: &str,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        for (i, bind_group) in textures.iter().enumerate() {
            pass.set_bind_group(i as u32 + 1, *bind_group, &[]);
        }
        pass.draw(0..3, 0..1);
    }
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

fn create_target(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    (width, height): (u32, u32),
    label: &str,
) -> Target {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    Target { view, bind_group }
}

fn create_mip_chain(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    levels: u32,
) -> Vec<Target> {
    mip_chain_sizes(width, height, levels)
        .into_iter()
        .enumerate()
        .map(|(i, size)| {
            log::trace!("Bloom mip {i}: {}x{}", size.0, size.1);
            create_target(device, layout, sampler, size, "post-mip")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_chain_halves_each_level() {
        let sizes = mip_chain_sizes(1920, 1080, 5);
        assert_eq!(sizes, vec![(960, 540), (480, 270), (240, 135), (120, 67), (60, 33)]);
    }

    #[test]
    fn test_mip_chain_never_below_one_pixel() {
        let sizes = mip_chain_sizes(6, 3, 4);
        assert_eq!(sizes, vec![(3, 1), (1, 1), (1, 1), (1, 1)]);
        assert!(mip_chain_sizes(640, 480, 0).is_empty());
    }

    #[test]
    fn test_upsample_sums() {
        assert_eq!(SUM.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(SUM.color.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn test_post_uniform_size() {
        assert_eq!(std::mem::size_of::<PostUniform>(), 32);
    }
}
