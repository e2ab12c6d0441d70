//! Configuration for the Orbis globe viewer.
//!
//! Settings persist to disk as `config.ron`. Every section is
//! `#[serde(default)]`, so older or hand-trimmed files keep loading, and
//! CLI flags override whatever was read from disk.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, CloudLayerConfig, Config, DataConfig, DebugConfig, EffectsConfig, GlobeConfig,
    MarkerConfig, RenderConfig, ShadingConfig, StarLayerConfig, TextureConfig, WindowConfig,
};
pub use error::ConfigError;
