//! CPU reference of the screen-space passes in `post.wgsl`.
//!
//! The scene lands in an HDR target. Bright pixels are extracted, blurred
//! down and back up a half-resolution mip chain, then screen-blended over
//! the scene before the vignette darkens the corners.

use glam::{Vec2, Vec3};

use crate::PostParams;
use crate::model::{luminance, smoothstep};
use crate::uniform::PostUniform;

/// Fraction of a pixel that feeds the bloom, from its luminance.
pub fn bloom_weight(lum: f32, p: &PostParams) -> f32 {
    smoothstep(p.bloom_threshold, p.bloom_threshold + p.bloom_smoothing, lum)
}

/// Extract pass.
pub fn bright_pass(color: Vec3, p: &PostParams) -> Vec3 {
    color * bloom_weight(luminance(color), p)
}

/// `1 - (1 - base) * (1 - blend)`, left unclamped above one.
pub fn screen_blend(base: Vec3, blend: Vec3) -> Vec3 {
    base + blend * (Vec3::ONE - base).max(Vec3::ZERO)
}

/// Darkening factor at `uv`: one in the middle, falling toward the corners.
pub fn vignette(uv: Vec2, offset: f32, darkness: f32) -> f32 {
    let d = uv.distance(Vec2::splat(0.5)) * (darkness + offset);
    smoothstep(0.8, offset * 0.799, d)
}

/// Composite pass. `bloom_sum` is the upsampled chain, one contribution per
/// level.
pub fn composite(scene: Vec3, bloom_sum: Vec3, uv: Vec2, p: &PostParams) -> Vec3 {
    let bloom = bloom_sum / p.bloom_levels as f32 * p.bloom_intensity;
    screen_blend(scene, bloom) * vignette(uv, p.vignette_offset, p.vignette_darkness)
}

impl PostParams {
    pub fn uniform(&self) -> PostUniform {
        PostUniform {
            bloom: [
                self.bloom_intensity,
                self.bloom_threshold,
                self.bloom_smoothing,
                self.bloom_levels as f32,
            ],
            vignette: [self.vignette_offset, self.vignette_darkness, 0.0, 0.0],
        }
    }
}
