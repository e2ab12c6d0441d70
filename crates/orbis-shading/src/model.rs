//! CPU reference of the globe surface shader.
//!
//! Stages run in a fixed order: day, night, terminator glow, specular glint,
//! fresnel rim, ambient floor and tone-map. The bump-perturbed normal feeds
//! the first four stages, so it is prepared up front by [`perturb_normal`];
//! the rim uses the unperturbed geometric normal.
//!
//! Vectors are world-space. `sun` and `view` point away from the surface.

use glam::Vec3;

use crate::ShadingParams;

/// Rec. 709 luma weights.
const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// WGSL `smoothstep`; reversed edges produce a falling curve.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn luminance(color: Vec3) -> f32 {
    color.dot(LUMA)
}

/// How much of the day texture shows, from `dot(n, sun)`.
pub fn day_factor(n_dot_s: f32, p: &ShadingParams) -> f32 {
    smoothstep(p.day_edges.0, p.day_edges.1, n_dot_s)
}

/// How much of the night-lights texture shows. Never overlaps a full day.
pub fn night_factor(n_dot_s: f32, p: &ShadingParams) -> f32 {
    smoothstep(p.night_edges.0, p.night_edges.1, n_dot_s) * (1.0 - day_factor(n_dot_s, p))
}

/// Stage 1.
pub fn day_color(diffuse: Vec3, n_dot_s: f32, p: &ShadingParams) -> Vec3 {
    diffuse * day_factor(n_dot_s, p)
}

/// Stage 2. Bright city cores are pushed harder than dim suburbs.
pub fn night_color(lights: Vec3, n_dot_s: f32, p: &ShadingParams) -> Vec3 {
    let boosted = lights + lights * lights * p.night_boost;
    boosted * night_factor(n_dot_s, p) * p.night_intensity
}

/// Bell-shaped weight inside the terminator band, zero at and beyond its
/// edges, peaking at `terminator_strength`.
pub fn terminator_weight(n_dot_s: f32, p: &ShadingParams) -> f32 {
    let (lo, hi) = p.terminator_edges;
    if n_dot_s <= lo || n_dot_s >= hi {
        return 0.0;
    }
    let mid = 0.5 * (lo + hi);
    let rise = smoothstep(lo, mid, n_dot_s);
    let fall = 1.0 - smoothstep(mid, hi, n_dot_s);
    rise * fall * p.terminator_strength
}

/// Stage 3.
pub fn terminator_glow(diffuse: Vec3, n_dot_s: f32, p: &ShadingParams) -> Vec3 {
    p.terminator_color * luminance(diffuse) * terminator_weight(n_dot_s, p)
}

/// Stage 4: two Blinn-Phong lobes, masked to water and to the day side.
pub fn specular(
    normal: Vec3,
    sun: Vec3,
    view: Vec3,
    mask: f32,
    day: f32,
    p: &ShadingParams,
) -> f32 {
    let half = (sun + view).normalize_or_zero();
    let n_dot_h = normal.dot(half).max(0.0);
    let tight = n_dot_h.powf(p.specular_tight.exponent) * p.specular_tight.strength;
    let broad = n_dot_h.powf(p.specular_broad.exponent) * p.specular_broad.strength;
    (tight + broad) * mask * day
}

/// East and north unit vectors at `normal`, matching increasing `u` and
/// decreasing `v` on the globe texture.
pub fn tangent_frame(normal: Vec3) -> (Vec3, Vec3) {
    let east = Vec3::Y.cross(normal);
    let tangent = if east.length_squared() < 1e-8 {
        Vec3::X
    } else {
        east.normalize()
    };
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}

/// Stage 5: offset the normal by a `[0, 1]`-encoded bump sample.
pub fn perturb_normal(normal: Vec3, bump_sample: Vec3, p: &ShadingParams) -> Vec3 {
    let (tangent, bitangent) = tangent_frame(normal);
    let offset = bump_sample * 2.0 - Vec3::ONE;
    let lifted = normal + (tangent * offset.x + bitangent * offset.y) * p.bump_scale;
    lifted.normalize_or(normal)
}

/// Schlick-style rim term.
pub fn fresnel(normal: Vec3, view: Vec3, power: f32) -> f32 {
    (1.0 - normal.dot(view).max(0.0)).powf(power)
}

/// Stage 6, weighted toward the lit limb.
pub fn rim(geometric_normal: Vec3, view: Vec3, sun: Vec3, p: &ShadingParams) -> Vec3 {
    let f = fresnel(geometric_normal, view, p.fresnel_power);
    let lit = day_factor(geometric_normal.dot(sun), p);
    let weight = p.rim_night_weight + (1.0 - p.rim_night_weight) * lit;
    p.atmosphere_color * f * p.rim_strength * weight
}

/// Stage 7 tone-map.
pub fn tonemap(color: Vec3, exposure: f32) -> Vec3 {
    color / (color + Vec3::ONE) * exposure
}

/// Texel values for one fragment, already in linear `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceSample {
    pub diffuse: Vec3,
    /// Tangent-space bump/normal texel, `(0.5, 0.5, 1)` when flat.
    pub bump: Vec3,
    /// Ocean mask; bright is water.
    pub specular: f32,
    pub night: Vec3,
}

impl SurfaceSample {
    /// What the neutral fallback textures produce.
    pub fn neutral() -> Self {
        Self {
            diffuse: Vec3::splat(0.5),
            bump: Vec3::new(0.5, 0.5, 1.0),
            specular: 0.0,
            night: Vec3::ZERO,
        }
    }
}

/// The full surface shader for one fragment.
pub fn shade_surface(
    sample: &SurfaceSample,
    geometric_normal: Vec3,
    view: Vec3,
    sun: Vec3,
    p: &ShadingParams,
) -> Vec3 {
    let n = perturb_normal(geometric_normal, sample.bump, p);
    let n_dot_s = n.dot(sun);
    let day = day_factor(n_dot_s, p);

    let mut color = day_color(sample.diffuse, n_dot_s, p);
    color += night_color(sample.night, n_dot_s, p);
    color += terminator_glow(sample.diffuse, n_dot_s, p);
    color += p.sun_color * specular(n, sun, view, sample.specular, day, p);
    color += rim(geometric_normal, view, sun, p);
    color += sample.diffuse * p.ambient;

    tonemap(color, p.exposure)
}

/// Surface shown while textures load: a flat colour with soft day/night
/// shading and the same rim as the realistic material.
pub fn shade_placeholder(geometric_normal: Vec3, view: Vec3, sun: Vec3, p: &ShadingParams) -> Vec3 {
    let lit = 0.35 + 0.65 * day_factor(geometric_normal.dot(sun), p);
    let color = p.placeholder_color * lit + rim(geometric_normal, view, sun, p);
    tonemap(color, p.exposure)
}
