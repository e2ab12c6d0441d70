//! Pipelines for the sphere passes: globe surface (two materials), cloud
//! shells, inner glow and outer atmosphere shell.

use std::num::NonZeroU64;

use orbis_shading::{AtmosphereUniform, CloudUniform, GlobeUniform};

use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::mesh::SphereVertex;
use crate::shader::ShaderKind;

/// Straight-alpha additive: `src.rgb * src.a + dst`.
pub const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

pub fn uniform_layout(device: &wgpu::Device, label: &str, size: usize) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

/// Fixed-function state for one sphere pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassState {
    pub cull_mode: Option<wgpu::Face>,
    pub blend: Option<wgpu::BlendState>,
    pub depth_write: bool,
}

impl PassState {
    pub const OPAQUE: Self = Self {
        cull_mode: Some(wgpu::Face::Back),
        blend: None,
        depth_write: true,
    };
    pub const CLOUDS: Self = Self {
        cull_mode: Some(wgpu::Face::Back),
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        depth_write: false,
    };
    pub const GLOW: Self = Self {
        cull_mode: Some(wgpu::Face::Back),
        blend: Some(ADDITIVE),
        depth_write: false,
    };
    /// Back faces only, so the shell reads as a halo around the limb.
    pub const SHELL: Self = Self {
        cull_mode: Some(wgpu::Face::Front),
        blend: Some(ADDITIVE),
        depth_write: false,
    };
}

pub struct SpherePipelineDesc<'a> {
    pub label: &'a str,
    pub layout: &'a wgpu::PipelineLayout,
    pub module: &'a wgpu::ShaderModule,
    pub fragment_entry: &'a str,
    pub format: wgpu::TextureFormat,
    pub state: PassState,
}

pub fn create_sphere_pipeline(device: &wgpu::Device, desc: &SpherePipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: Some("vs_main"),
            buffers: &[SphereVertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.state.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(DepthBuffer::stencil_state(desc.state.depth_write)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.state.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Bind group layouts and pipelines for every sphere pass.
pub struct SpherePipelines {
    pub camera_layout: wgpu::BindGroupLayout,
    pub globe_layout: wgpu::BindGroupLayout,
    pub cloud_layout: wgpu::BindGroupLayout,
    pub atmosphere_layout: wgpu::BindGroupLayout,
    pub realistic: wgpu::RenderPipeline,
    pub placeholder: wgpu::RenderPipeline,
    pub clouds: wgpu::RenderPipeline,
    pub glow: wgpu::RenderPipeline,
    pub shell: wgpu::RenderPipeline,
}

impl SpherePipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let camera_layout = uniform_layout(device, "camera-layout", std::mem::size_of::<CameraUniform>());
        let globe_layout = uniform_layout(device, "globe-layout", std::mem::size_of::<GlobeUniform>());
        let cloud_layout = uniform_layout(device, "cloud-layout", std::mem::size_of::<CloudUniform>());
        let atmosphere_layout =
            uniform_layout(device, "atmosphere-layout", std::mem::size_of::<AtmosphereUniform>());

        let textured = |label: &str, object: &wgpu::BindGroupLayout| {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[&camera_layout, object, texture_layout],
                immediate_size: 0,
            })
        };
        let globe_pipeline_layout = textured("globe-pipeline-layout", &globe_layout);
        let cloud_pipeline_layout = textured("cloud-pipeline-layout", &cloud_layout);
        let atmosphere_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("atmosphere-pipeline-layout"),
            bind_group_layouts: &[&camera_layout, &atmosphere_layout],
            immediate_size: 0,
        });

        let globe_module = ShaderKind::Globe.create_module(device);
        let cloud_module = ShaderKind::Clouds.create_module(device);
        let atmosphere_module = ShaderKind::Atmosphere.create_module(device);

        let sphere = |label: &str,
                      layout: &wgpu::PipelineLayout,
                      module: &wgpu::ShaderModule,
                      fragment_entry: &str,
                      state: PassState| {
            create_sphere_pipeline(
                device,
                &SpherePipelineDesc {
                    label,
                    layout,
                    module,
                    fragment_entry,
                    format,
                    state,
                },
            )
        };

        let realistic = sphere(
            "globe-realistic",
            &globe_pipeline_layout,
            &globe_module,
            "fs_realistic",
            PassState::OPAQUE,
        );
        let placeholder = sphere(
            "globe-placeholder",
            &globe_pipeline_layout,
            &globe_module,
            "fs_placeholder",
            PassState::OPAQUE,
        );
        let clouds = sphere("clouds", &cloud_pipeline_layout, &cloud_module, "fs_main", PassState::CLOUDS);
        let glow = sphere(
            "inner-glow",
            &atmosphere_pipeline_layout,
            &atmosphere_module,
            "fs_glow",
            PassState::GLOW,
        );
        let shell = sphere(
            "atmosphere-shell",
            &atmosphere_pipeline_layout,
            &atmosphere_module,
            "fs_shell",
            PassState::SHELL,
        );

        log::info!("Sphere pipelines created for {format:?}");

        Self {
            camera_layout,
            globe_layout,
            cloud_layout,
            atmosphere_layout,
            realistic,
            placeholder,
            clouds,
            glow,
            shell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_passes_do_not_write_depth() {
        for state in [PassState::CLOUDS, PassState::GLOW, PassState::SHELL] {
            assert!(!state.depth_write);
            assert!(state.blend.is_some());
        }
        assert!(PassState::OPAQUE.depth_write);
    }

    #[test]
    fn test_shell_renders_back_faces() {
        assert_eq!(PassState::SHELL.cull_mode, Some(wgpu::Face::Front));
        assert_eq!(PassState::GLOW.cull_mode, Some(wgpu::Face::Back));
    }

    #[test]
    fn test_additive_blend_factors() {
        assert_eq!(ADDITIVE.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(ADDITIVE.color.dst_factor, wgpu::BlendFactor::One);
    }
}
