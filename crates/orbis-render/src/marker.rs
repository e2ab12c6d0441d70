//! Instanced beacon rendering: one draw call for every marker.

use bytemuck::{Pod, Zeroable};
use orbis_globe::MarkerDraw;
use static_assertions::const_assert_eq;

use crate::depth::DepthBuffer;
use crate::pipeline::ADDITIVE;
use crate::shader::{ShaderKind, marker_layout};

/// Per-marker instance data; see `marker.wgsl` for the row meanings.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub dot_color: [f32; 4],
    /// beam height, beam width, breathe scale, dot height
    pub shape: [f32; 4],
    /// dot size, base radius, pulse radius, pulse opacity
    pub sizes: [f32; 4],
    /// beam, glow, base, unused
    pub opacity: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<MarkerInstance>(), 144);

impl MarkerInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x4,
            1 => Float32x4,
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
        ],
    };

    pub fn from_draw(draw: &MarkerDraw, base_radius: f32) -> Self {
        let v = &draw.visual;
        let (pulse_radius, pulse_opacity) = v.pulse.map_or((0.0, 0.0), |p| (p.radius, p.opacity));
        Self {
            model: draw.transform.to_cols_array_2d(),
            color: draw.color.extend(1.0).to_array(),
            dot_color: draw.dot_color.extend(1.0).to_array(),
            shape: [v.beam_height, v.beam_width, v.scale, v.dot_height],
            sizes: [v.dot_size, base_radius, pulse_radius, pulse_opacity],
            opacity: [v.beam_opacity, v.glow_opacity.max(0.0), v.base_opacity, 0.0],
        }
    }
}

/// Instance capacity needed for `count` markers: the next power of two,
/// at least 16.
pub fn grown_capacity(current: usize, count: usize) -> usize {
    if count <= current {
        current
    } else {
        count.next_power_of_two().max(16)
    }
}

pub struct MarkerPipeline {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    instances: Vec<MarkerInstance>,
}

impl MarkerPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, camera_layout: &wgpu::BindGroupLayout) -> Self {
        let module = ShaderKind::Marker.create_module(device);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[camera_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[MarkerInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Beam planes and the glow tube are seen from both sides.
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

        let capacity = grown_capacity(0, 1);
        let instance_buffer = Self::create_instance_buffer(device, capacity);
        Self {
            pipeline,
            instance_buffer,
            capacity,
            instances: Vec::new(),
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker-instances"),
            size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Pack and upload this frame's markers, growing the buffer if needed.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[MarkerDraw], base_radius: f32) {
        self.instances.clear();
        self.instances
            .extend(draws.iter().map(|d| MarkerInstance::from_draw(d, base_radius)));

        let needed = grown_capacity(self.capacity, self.instances.len());
        if needed != self.capacity {
            log::debug!("Growing marker instance buffer {} -> {needed}", self.capacity);
            self.instance_buffer = Self::create_instance_buffer(device, needed);
            self.capacity = needed;
        }
        if !self.instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup) {
        if self.instances.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..marker_layout::VERTEX_COUNT, 0..self.instance_count());
    }
}
