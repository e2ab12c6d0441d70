//! Latitude/longitude sphere shared by the globe, cloud and atmosphere passes.
//!
//! Vertices follow the same spherical mapping as `orbis_geo::project`, so a
//! texel at `u = (lng + 180) / 360`, `v = (90 - lat) / 180` lands exactly under
//! a marker at `(lat, lng)`.

use bytemuck::{Pod, Zeroable};
use orbis_geo::spherical_direction;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };
}

/// CPU-side unit sphere.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Unit sphere with a seam column of duplicated vertices at `u = 0/1`.
    /// Segment counts below the minimum (3 around, 2 down) are raised to it.
    pub fn uv_sphere(width_segments: u32, height_segments: u32) -> Self {
        let width = width_segments.max(3);
        let height = height_segments.max(2);
        let row = width + 1;

        let mut vertices = Vec::with_capacity((row * (height + 1)) as usize);
        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                let dir = spherical_direction(v * std::f32::consts::PI, u * std::f32::consts::TAU);
                vertices.push(SphereVertex {
                    position: dir.to_array(),
                    normal: dir.to_array(),
                    uv: [u, v],
                });
            }
        }

        // The first and last rings collapse to a pole; skip their degenerate half.
        let mut indices = Vec::with_capacity((width * height * 6) as usize);
        for iy in 0..height {
            for ix in 0..width {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
