//! Starfield backdrop: one instanced draw of screen-space sprites.

use bytemuck::{Pod, Zeroable};
use orbis_config::EffectsConfig;
use orbis_shading::{StarLayer, StarPoint, StarUniform, StarfieldGenerator};
use static_assertions::const_assert_eq;
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;
use crate::pipeline::{ADDITIVE, uniform_layout};
use crate::shader::ShaderKind;

/// Vertices per star sprite: two triangles.
pub const STAR_VERTICES: u32 = 6;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    /// xyz = position, w = base size.
    pub position_size: [f32; 4],
    /// twinkle speed, grey level, unused, unused.
    pub params: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<StarInstance>(), 32);

impl StarInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4],
    };

    pub fn new(star: &StarPoint, grey: f32) -> Self {
        Self {
            position_size: star.position.extend(star.size).to_array(),
            params: [star.twinkle_speed, grey, 0.0, 0.0],
        }
    }
}

/// Star instances for the configured layers.
pub fn star_instances(config: &EffectsConfig) -> Vec<StarInstance> {
    let layers = config.star_layers.iter().map(StarLayer::from).collect();
    StarfieldGenerator::new(config.star_seed, layers)
        .generate()
        .iter()
        .map(|star| StarInstance::new(star, config.star_brightness))
        .collect()
}

pub struct StarfieldPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: Option<wgpu::Buffer>,
    count: u32,
}

impl StarfieldPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        config: &EffectsConfig,
    ) -> Self {
        let module = ShaderKind::Stars.create_module(device);
        let layout = uniform_layout(device, "stars-layout", std::mem::size_of::<StarUniform>());
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("stars-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("stars-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[StarInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(false)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("stars-uniform"),
            contents: bytemuck::bytes_of(&StarUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stars-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        let mut stars = Self {
            pipeline,
            uniform,
            bind_group,
            instances: None,
            count: 0,
        };
        stars.rebuild(device, config);
        stars
    }

    /// Regenerate the sky, e.g. after the seed or layers changed.
    pub fn rebuild(&mut self, device: &wgpu::Device, config: &EffectsConfig) {
        let instances = star_instances(config);
        self.count = instances.len() as u32;
        self.instances = (!instances.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("star-instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        log::debug!("Starfield built with {} stars", self.count);
    }

    pub fn star_count(&self) -> u32 {
        self.count
    }

    pub fn prepare(&self, queue: &wgpu::Queue, uniform: &StarUniform) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(uniform));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup) {
        let Some(instances) = &self.instances else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, instances.slice(..));
        pass.draw(0..STAR_VERTICES, 0..self.count);
    }
}
