//! WGSL sources for the globe passes.
//!
//! Each scene pass is `common.wgsl` followed by its own file; the
//! screen-space post shader stands alone. The marker shader
//! also gets its vertex ranges as generated constants so the Rust draw
//! count and the WGSL dispatch cannot drift apart.

use std::fmt::Write;

const COMMON: &str = include_str!("shaders/common.wgsl");
const GLOBE: &str = include_str!("shaders/globe.wgsl");
const CLOUDS: &str = include_str!("shaders/clouds.wgsl");
const ATMOSPHERE: &str = include_str!("shaders/atmosphere.wgsl");
const MARKER: &str = include_str!("shaders/marker.wgsl");
const STARS: &str = include_str!("shaders/stars.wgsl");
const POST: &str = include_str!("shaders/post.wgsl");

/// Vertices emitted per marker instance, by part, in draw order.
pub mod marker_layout {
    pub const GLOW_SEGMENTS: u32 = 16;
    pub const BASE_SEGMENTS: u32 = 24;
    pub const RING_SEGMENTS: u32 = 32;

    pub const BEAM: u32 = 12;
    pub const GLOW: u32 = GLOW_SEGMENTS * 6;
    pub const BASE: u32 = BASE_SEGMENTS * 3;
    pub const RING: u32 = RING_SEGMENTS * 6;
    pub const DOT: u32 = 6;
    pub const HALO: u32 = 6;

    pub const VERTEX_COUNT: u32 = BEAM + GLOW + BASE + RING + DOT + HALO;

    /// Height of the base disc and pulse ring above the placement point.
    pub const BASE_LIFT: f32 = 0.001;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    Globe,
    Clouds,
    Atmosphere,
    Marker,
    Stars,
    Post,
}

impl ShaderKind {
    pub fn label(self) -> &'static str {
        match self {
            ShaderKind::Globe => "globe-shader",
            ShaderKind::Clouds => "clouds-shader",
            ShaderKind::Atmosphere => "atmosphere-shader",
            ShaderKind::Marker => "marker-shader",
            ShaderKind::Stars => "stars-shader",
            ShaderKind::Post => "post-shader",
        }
    }

    pub fn source(self) -> String {
        if self == ShaderKind::Post {
            return String::from(POST);
        }
        let mut src = String::from(COMMON);
        match self {
            ShaderKind::Globe => src.push_str(GLOBE),
            ShaderKind::Clouds => src.push_str(CLOUDS),
            ShaderKind::Atmosphere => src.push_str(ATMOSPHERE),
            ShaderKind::Marker => {
                src.push_str(&marker_constants());
                src.push_str(MARKER);
            }
            ShaderKind::Stars => src.push_str(STARS),
            ShaderKind::Post => {}
        }
        src
    }

    pub fn create_module(self, device: &wgpu::Device) -> wgpu::ShaderModule {
        log::debug!("Compiling {}", self.label());
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label()),
            source: wgpu::ShaderSource::Wgsl(self.source().into()),
        })
    }
}

fn marker_constants() -> String {
    use marker_layout::*;
    let mut out = String::from("\n");
    let mut end = 0;
    let parts = [
        ("BEAM", BEAM),
        ("GLOW", GLOW),
        ("BASE", BASE),
        ("RING", RING),
        ("DOT", DOT),
        ("HALO", HALO),
    ];
    for (i, (name, count)) in parts.iter().enumerate() {
        end += count;
        let _ = writeln!(out, "const PART_{name}: u32 = {i}u;");
        let _ = writeln!(out, "const {name}_END: u32 = {end}u;");
    }
    let _ = writeln!(out, "const GLOW_SEGMENTS: u32 = {GLOW_SEGMENTS}u;");
    let _ = writeln!(out, "const BASE_SEGMENTS: u32 = {BASE_SEGMENTS}u;");
    let _ = writeln!(out, "const RING_SEGMENTS: u32 = {RING_SEGMENTS}u;");
    let _ = writeln!(out, "const BASE_LIFT: f32 = {BASE_LIFT:?};");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_carry_entry_points() {
        let globe = ShaderKind::Globe.source();
        assert!(globe.contains("fn vs_main"));
        assert!(globe.contains("fn fs_realistic"));
        assert!(globe.contains("fn fs_placeholder"));
        assert!(globe.contains("fn smooth_step"), "common prelude missing");

        let atmo = ShaderKind::Atmosphere.source();
        assert!(atmo.contains("fn fs_shell") && atmo.contains("fn fs_glow"));
        assert!(ShaderKind::Clouds.source().contains("fn fs_main"));
    }

    #[test]
    fn test_post_shader_stands_alone() {
        let post = ShaderKind::Post.source();
        for entry in ["fn vs_fullscreen", "fn fs_extract", "fn fs_downsample", "fn fs_upsample", "fn fs_composite"] {
            assert!(post.contains(entry), "{entry} missing");
        }
        // Group 0 is the post uniform here, not the camera.
        assert!(!post.contains("var<uniform> camera"));

        let stars = ShaderKind::Stars.source();
        assert!(stars.contains("var<uniform> camera") && stars.contains("fn fs_main"));
    }

    #[test]
    fn test_marker_constants_match_vertex_count() {
        let src = ShaderKind::Marker.source();
        assert!(src.contains("const BEAM_END: u32 = 12u;"));
        assert!(src.contains(&format!("const HALO_END: u32 = {}u;", marker_layout::VERTEX_COUNT)));
        assert!(src.contains("const PART_HALO: u32 = 5u;"));
        assert!(src.contains("const BASE_LIFT: f32 = 0.001;"));
    }

    #[test]
    fn test_marker_vertex_count() {
        assert_eq!(marker_layout::VERTEX_COUNT, 12 + 96 + 72 + 192 + 6 + 6);
    }
}
