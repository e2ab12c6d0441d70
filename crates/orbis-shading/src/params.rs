//! Shading constants in their runtime form.

use glam::Vec3;
use orbis_config::{EffectsConfig, ShadingConfig};

/// One Blinn-Phong lobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpecularLobe {
    pub exponent: f32,
    pub strength: f32,
}

/// Outer atmosphere shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellParams {
    /// Colour where the shell is thin (near the planet limb).
    pub inner_color: Vec3,
    /// Colour toward the outer edge.
    pub outer_color: Vec3,
    pub fresnel_power: f32,
    pub intensity: f32,
    pub alpha: f32,
    /// Brightness of the unlit side relative to the lit side.
    pub night_weight: f32,
}

/// Inner glow hugging the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowParams {
    pub color: Vec3,
    pub fresnel_power: f32,
    pub alpha: f32,
}

/// Every weight, edge and exponent used by the globe shaders.
///
/// Edge pairs are `(edge0, edge1)` for `smoothstep` over `dot(n, sun)`.
/// Reversed edges (`edge0 > edge1`) give a falling curve.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadingParams {
    pub day_edges: (f32, f32),
    pub night_edges: (f32, f32),
    pub night_boost: f32,
    pub night_intensity: f32,
    pub terminator_edges: (f32, f32),
    pub terminator_color: Vec3,
    pub terminator_strength: f32,
    pub sun_color: Vec3,
    pub specular_tight: SpecularLobe,
    pub specular_broad: SpecularLobe,
    pub bump_scale: f32,
    pub atmosphere_color: Vec3,
    pub fresnel_power: f32,
    pub rim_strength: f32,
    pub rim_night_weight: f32,
    pub ambient: Vec3,
    pub exposure: f32,
    pub cloud_ambient: f32,
    pub placeholder_color: Vec3,
    pub shell: ShellParams,
    pub glow: GlowParams,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self::from(&ShadingConfig::default())
    }
}

impl From<&ShadingConfig> for ShadingParams {
    fn from(c: &ShadingConfig) -> Self {
        let pair = |p: [f32; 2]| (p[0], p[1]);
        Self {
            day_edges: pair(c.day_edges),
            night_edges: pair(c.night_edges),
            night_boost: c.night_boost,
            night_intensity: c.night_intensity,
            terminator_edges: pair(c.terminator_edges),
            terminator_color: Vec3::from_array(c.terminator_color),
            terminator_strength: c.terminator_strength,
            sun_color: Vec3::from_array(c.sun_color),
            specular_tight: SpecularLobe {
                exponent: c.specular_tight_exponent,
                strength: c.specular_tight_strength,
            },
            specular_broad: SpecularLobe {
                exponent: c.specular_broad_exponent,
                strength: c.specular_broad_strength,
            },
            bump_scale: c.bump_scale,
            atmosphere_color: Vec3::from_array(c.atmosphere_color),
            fresnel_power: c.fresnel_power,
            rim_strength: c.rim_strength,
            rim_night_weight: c.rim_night_weight,
            ambient: Vec3::from_array(c.ambient),
            exposure: c.exposure,
            cloud_ambient: c.cloud_ambient,
            placeholder_color: Vec3::from_array(c.placeholder_color),
            shell: ShellParams {
                inner_color: Vec3::from_array(c.shell_inner_color),
                outer_color: Vec3::from_array(c.shell_outer_color),
                fresnel_power: c.shell_fresnel_power,
                intensity: c.shell_intensity,
                alpha: c.shell_alpha,
                night_weight: c.shell_night_weight,
            },
            glow: GlowParams {
                color: Vec3::from_array(c.glow_color),
                fresnel_power: c.glow_fresnel_power,
                alpha: c.glow_alpha,
            },
        }
    }
}

/// Bloom and vignette settings for the screen-space passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostParams {
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_smoothing: f32,
    pub bloom_levels: u32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

impl Default for PostParams {
    fn default() -> Self {
        Self::from(&EffectsConfig::default())
    }
}

impl From<&EffectsConfig> for PostParams {
    fn from(c: &EffectsConfig) -> Self {
        Self {
            bloom_intensity: c.bloom_intensity,
            bloom_threshold: c.bloom_threshold,
            bloom_smoothing: c.bloom_smoothing,
            bloom_levels: c.bloom_levels.max(1),
            vignette_offset: c.vignette_offset,
            vignette_darkness: c.vignette_darkness,
        }
    }
}
