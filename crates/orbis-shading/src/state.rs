//! Per-globe shading state.

use glam::{Mat4, Vec3};
use orbis_config::ShadingConfig;

use crate::ShadingParams;
use crate::uniform::{AtmosphereUniform, CloudUniform, GlobeUniform, StarUniform};

/// Sun direction, constants and the shader clock for one globe.
///
/// Passed by `&mut` into the frame update and by `&` into rendering.
#[derive(Clone, Debug)]
pub struct ShadingState {
    sun_direction: Vec3,
    pub params: ShadingParams,
    elapsed_time: f32,
}

impl ShadingState {
    /// `sun_position` only contributes its direction.
    pub fn new(params: ShadingParams, sun_position: Vec3) -> Self {
        Self {
            sun_direction: sun_position.normalize_or(Vec3::X),
            params,
            elapsed_time: 0.0,
        }
    }

    pub fn from_config(config: &ShadingConfig, sun_position: [f32; 3]) -> Self {
        Self::new(ShadingParams::from(config), Vec3::from_array(sun_position))
    }

    /// Advance the shader clock. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_time += dt;
        }
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    pub fn set_sun_direction(&mut self, direction: Vec3) {
        self.sun_direction = direction.normalize_or(self.sun_direction);
    }

    /// Surface uniforms; `model` carries the globe spin and radius.
    pub fn globe_uniform(&self, model: Mat4) -> GlobeUniform {
        let p = &self.params;
        GlobeUniform {
            model: model.to_cols_array_2d(),
            sun_direction: self.sun_direction.extend(self.elapsed_time).to_array(),
            sun_color: p.sun_color.extend(p.exposure).to_array(),
            day_night_edges: [p.day_edges.0, p.day_edges.1, p.night_edges.0, p.night_edges.1],
            night_terminator: [
                p.night_boost,
                p.night_intensity,
                p.terminator_edges.0,
                p.terminator_edges.1,
            ],
            terminator_color: p.terminator_color.extend(p.terminator_strength).to_array(),
            specular: [
                p.specular_tight.exponent,
                p.specular_tight.strength,
                p.specular_broad.exponent,
                p.specular_broad.strength,
            ],
            atmosphere: p.atmosphere_color.extend(p.fresnel_power).to_array(),
            rim_bump: [p.rim_strength, p.rim_night_weight, p.bump_scale, 0.0],
            ambient: p.ambient.extend(0.0).to_array(),
            placeholder: p.placeholder_color.extend(1.0).to_array(),
        }
    }

    /// Outer shell uniforms.
    pub fn shell_uniform(&self, model: Mat4) -> AtmosphereUniform {
        let p = &self.params;
        let s = &p.shell;
        AtmosphereUniform {
            model: model.to_cols_array_2d(),
            color_a: s.inner_color.extend(s.fresnel_power).to_array(),
            color_b: s.outer_color.extend(s.intensity).to_array(),
            params: [s.alpha, s.night_weight, p.day_edges.0, p.day_edges.1],
            sun_direction: self.sun_direction.extend(0.0).to_array(),
        }
    }

    /// Inner glow uniforms.
    pub fn glow_uniform(&self, model: Mat4) -> AtmosphereUniform {
        let p = &self.params;
        let g = &p.glow;
        AtmosphereUniform {
            model: model.to_cols_array_2d(),
            color_a: g.color.extend(g.fresnel_power).to_array(),
            color_b: [0.0; 4],
            params: [g.alpha, 1.0, p.day_edges.0, p.day_edges.1],
            sun_direction: self.sun_direction.extend(0.0).to_array(),
        }
    }

    /// Uniforms for one cloud shell.
    pub fn cloud_uniform(&self, model: Mat4, opacity: f32) -> CloudUniform {
        let p = &self.params;
        CloudUniform {
            model: model.to_cols_array_2d(),
            sun_direction: self.sun_direction.extend(opacity).to_array(),
            params: [p.cloud_ambient, p.day_edges.0, p.day_edges.1, 0.0],
        }
    }

    /// Starfield uniforms for a `width` x `height` surface.
    pub fn star_uniform(&self, width: u32, height: u32) -> StarUniform {
        StarUniform {
            viewport: [width.max(1) as f32, height.max(1) as f32, self.elapsed_time, 0.0],
        }
    }
}

impl Default for ShadingState {
    fn default() -> Self {
        Self::new(ShadingParams::default(), Vec3::new(8.0, 3.0, 6.0))
    }
}
