//! Layered-texture planet shading.
//!
//! [`model`] is the CPU reference of the globe fragment shader, stage by
//! stage, and [`atmosphere`] does the same for the shell and glow passes.
//! The WGSL in `orbis-render` mirrors these functions line for line.
//! [`stars`] places the starfield backdrop and [`post`] covers the bloom
//! and vignette passes. [`ShadingState`] owns the per-globe parameters and
//! packs them into the uniform blocks in [`uniform`].

pub mod atmosphere;
pub mod model;
mod params;
pub mod post;
pub mod stars;
mod state;
pub mod uniform;

pub use params::{GlowParams, PostParams, ShadingParams, ShellParams, SpecularLobe};
pub use stars::{StarLayer, StarPoint, StarfieldGenerator};
pub use state::ShadingState;
pub use uniform::{AtmosphereUniform, CloudUniform, GlobeUniform, PostUniform, StarUniform};
