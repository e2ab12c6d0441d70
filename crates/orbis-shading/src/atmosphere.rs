//! CPU reference of the atmosphere shell, inner glow and cloud passes.
//!
//! Shell and glow are blended additively (`src * alpha + dst`), so the
//! visible contribution of a fragment is `rgb * alpha`.

use glam::{Vec3, Vec4};

use crate::ShadingParams;
use crate::model::{day_factor, fresnel, luminance, smoothstep};

/// Width of the fade at the outer silhouette of the shell, in `dot(n, v)`.
const SHELL_EDGE_FADE: f32 = 0.15;

/// Outer shell fragment, rendered from its back faces.
///
/// `normal` is the outward shell normal. Seen from outside, back faces point
/// away from the viewer, so the rim term is taken against the flipped normal.
pub fn shell_color(normal: Vec3, view: Vec3, sun: Vec3, p: &ShadingParams) -> Vec4 {
    let s = &p.shell;
    let facing = (-normal).dot(view).max(0.0);
    let f = fresnel(-normal, view, s.fresnel_power);

    let tint = s.inner_color.lerp(s.outer_color, f * 0.5);
    let lit = day_factor(normal.dot(sun), p);
    let sun_weight = s.night_weight + (1.0 - s.night_weight) * lit;
    let edge = smoothstep(0.0, SHELL_EDGE_FADE, facing);

    let rgb = tint * f * s.intensity * sun_weight * edge;
    let alpha = smoothstep(0.0, 0.6, f) * s.alpha * edge;
    rgb.extend(alpha)
}

/// Inner glow fragment, rendered from front faces just above the surface.
pub fn glow_color(normal: Vec3, view: Vec3, p: &ShadingParams) -> Vec4 {
    let g = &p.glow;
    let f = fresnel(normal, view, g.fresnel_power);
    g.color.extend(f * g.alpha)
}

/// Cloud fragment with straight alpha.
///
/// Works for both opaque greyscale maps (density in RGB) and white maps that
/// carry density in alpha.
pub fn cloud_color(sample: Vec4, normal: Vec3, sun: Vec3, opacity: f32, p: &ShadingParams) -> Vec4 {
    let rgb = sample.truncate();
    let density = luminance(rgb) * sample.w;
    let lit = day_factor(normal.dot(sun), p).max(p.cloud_ambient);
    (rgb * lit).extend(density * opacity)
}
