//! GPU uniform blocks for the globe passes.
//!
//! Every block is `#[repr(C)]`, `Pod`, a multiple of 16 bytes and laid out as
//! `vec4` rows so the WGSL structs need no padding fields.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Surface pass: model transform plus every [`crate::ShadingParams`] field
/// the fragment shader reads.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobeUniform {
    pub model: [[f32; 4]; 4],
    /// xyz = unit sun direction, w = elapsed seconds.
    pub sun_direction: [f32; 4],
    /// rgb = sun colour, w = exposure.
    pub sun_color: [f32; 4],
    /// day edge0, day edge1, night edge0, night edge1.
    pub day_night_edges: [f32; 4],
    /// night boost, night intensity, terminator edge0, terminator edge1.
    pub night_terminator: [f32; 4],
    /// rgb = terminator colour, w = terminator strength.
    pub terminator_color: [f32; 4],
    /// tight exponent, tight strength, broad exponent, broad strength.
    pub specular: [f32; 4],
    /// rgb = rim colour, w = fresnel power.
    pub atmosphere: [f32; 4],
    /// rim strength, rim night weight, bump scale, unused.
    pub rim_bump: [f32; 4],
    /// rgb = ambient floor.
    pub ambient: [f32; 4],
    /// rgb = placeholder colour.
    pub placeholder: [f32; 4],
}

/// Atmosphere shell and inner glow share this block.
///
/// For the glow, `color_a` carries the glow colour and power and the other
/// colour row is ignored.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AtmosphereUniform {
    pub model: [[f32; 4]; 4],
    /// rgb = inner colour, w = fresnel power.
    pub color_a: [f32; 4],
    /// rgb = outer colour, w = intensity.
    pub color_b: [f32; 4],
    /// alpha, night weight, day edge0, day edge1.
    pub params: [f32; 4],
    /// xyz = unit sun direction.
    pub sun_direction: [f32; 4],
}

/// One cloud shell.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CloudUniform {
    pub model: [[f32; 4]; 4],
    /// xyz = unit sun direction, w = layer opacity.
    pub sun_direction: [f32; 4],
    /// ambient floor, day edge0, day edge1, unused.
    pub params: [f32; 4],
}

/// Screen-space passes: bloom extract and the final composite.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PostUniform {
    /// intensity, threshold, smoothing, level count.
    pub bloom: [f32; 4],
    /// offset, darkness, unused, unused.
    pub vignette: [f32; 4],
}

/// Starfield sprites.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarUniform {
    /// viewport width, viewport height, elapsed seconds, unused.
    pub viewport: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<GlobeUniform>(), 224);
const_assert_eq!(std::mem::size_of::<PostUniform>(), 32);
const_assert_eq!(std::mem::size_of::<StarUniform>(), 16);
const_assert_eq!(std::mem::size_of::<AtmosphereUniform>(), 128);
const_assert_eq!(std::mem::size_of::<CloudUniform>(), 96);
const_assert_eq!(std::mem::size_of::<GlobeUniform>() % 16, 0);
const_assert_eq!(std::mem::size_of::<AtmosphereUniform>() % 16, 0);
const_assert_eq!(std::mem::size_of::<CloudUniform>() % 16, 0);
