//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Orbit camera settings.
    pub camera: CameraConfig,
    /// Globe geometry and animation.
    pub globe: GlobeConfig,
    /// Surface and atmosphere shading constants.
    pub shading: ShadingConfig,
    /// Texture file locations.
    pub textures: TextureConfig,
    /// Marker glyph dimensions and colours.
    pub markers: MarkerConfig,
    /// Starfield backdrop and post-processing.
    pub effects: EffectsConfig,
    /// Item data source.
    pub data: DataConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Longitude segments of the globe sphere.
    pub sphere_width_segments: u32,
    /// Latitude segments of the globe sphere.
    pub sphere_height_segments: u32,
    /// Longitude segments of the cloud shells.
    pub cloud_width_segments: u32,
    /// Latitude segments of the cloud shells.
    pub cloud_height_segments: u32,
    /// Background colour (linear RGBA).
    pub clear_color: [f32; 4],
    /// Target frame rate (0 = unlimited / vsync).
    pub target_fps: u32,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Starting azimuth in degrees (90 looks down -Z from +Z).
    pub start_azimuth_deg: f32,
    /// Starting polar angle in degrees, measured from +Y.
    pub start_polar_deg: f32,
    pub start_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Lower polar clamp as a fraction of PI.
    pub min_polar_frac: f32,
    /// Upper polar clamp as a fraction of PI.
    pub max_polar_frac: f32,
    /// Per-frame approach factor at 60 Hz, in `(0, 1]`.
    pub damping: f32,
    /// Full-height drag rotates by `2 * PI * rotate_speed`.
    pub rotate_speed: f32,
    /// Zoom strength per scroll line.
    pub zoom_speed: f32,
    /// Fly-to duration in seconds.
    pub fly_duration: f32,
    /// Camera distance at the end of a fly-to.
    pub fly_distance: f32,
    /// Pointer travel in pixels before a press counts as a drag.
    pub drag_threshold_px: f32,
}

/// One rotating cloud shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudLayerConfig {
    /// Height above the globe surface.
    pub offset: f32,
    /// Spin about +Y in radians per second (negative spins west).
    pub rotation_rate: f32,
    pub opacity: f32,
    /// Fixed Euler tilt (XYZ, radians) applied before the spin.
    pub tilt: [f32; 3],
}

/// Globe geometry and animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    pub radius: f32,
    /// Idle spin in radians per second.
    pub rotation_rate: f32,
    pub cloud_layers: Vec<CloudLayerConfig>,
    /// Outer atmosphere shell radius as a multiple of `radius`.
    pub atmosphere_scale: f32,
    /// Height of the inner glow shell above the surface.
    pub inner_glow_offset: f32,
    /// Seconds between texture resolution and the loaded signal.
    pub settle_delay_s: f32,
    /// Sun position; only the direction is used.
    pub sun_position: [f32; 3],
}

/// Shading constants for the globe surface and its atmosphere.
///
/// Edges are `smoothstep` edges over `dot(normal, sun)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShadingConfig {
    pub day_edges: [f32; 2],
    pub night_edges: [f32; 2],
    /// Quadratic boost applied to night-light samples.
    pub night_boost: f32,
    pub night_intensity: f32,
    pub terminator_edges: [f32; 2],
    pub terminator_color: [f32; 3],
    /// Upper bound of the terminator tint relative to day luminance.
    pub terminator_strength: f32,
    pub sun_color: [f32; 3],
    pub specular_tight_exponent: f32,
    pub specular_tight_strength: f32,
    pub specular_broad_exponent: f32,
    pub specular_broad_strength: f32,
    pub bump_scale: f32,
    pub atmosphere_color: [f32; 3],
    pub fresnel_power: f32,
    pub rim_strength: f32,
    /// Rim weight on the unlit side, relative to the lit side.
    pub rim_night_weight: f32,
    pub ambient: [f32; 3],
    pub exposure: f32,
    pub cloud_ambient: f32,
    /// Flat colour of the globe before its textures resolve.
    pub placeholder_color: [f32; 3],
    pub shell_inner_color: [f32; 3],
    pub shell_outer_color: [f32; 3],
    pub shell_fresnel_power: f32,
    pub shell_intensity: f32,
    pub shell_alpha: f32,
    pub shell_night_weight: f32,
    pub glow_color: [f32; 3],
    pub glow_fresnel_power: f32,
    pub glow_alpha: f32,
}

/// Texture file locations, relative to `directory` unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    pub directory: PathBuf,
    pub diffuse: PathBuf,
    pub bump: PathBuf,
    pub specular: PathBuf,
    pub night: PathBuf,
    pub clouds: PathBuf,
    /// Decoder threads (0 = pick from the CPU count).
    pub loader_threads: usize,
}

/// Marker glyph dimensions, per visual state where it varies.
///
/// Triples are ordered idle, hovered, selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
    pub surface_offset: f32,
    pub beam_height: f32,
    pub hover_beam_scale: f32,
    pub selected_beam_height: f32,
    pub beam_width: [f32; 3],
    pub beam_opacity: [f32; 3],
    pub dot_size: [f32; 3],
    pub glow_opacity: [f32; 3],
    pub glow_wobble: f32,
    pub breathe_amplitude: f32,
    pub float_amplitude: f32,
    pub base_radius: f32,
    pub hit_radius: f32,
    /// Extra hit height beyond the beam.
    pub hit_padding: f32,
    /// Seconds per selection pulse.
    pub pulse_period: f32,
    pub pulse_max_radius: f32,
    pub instruments_color: [f32; 3],
    pub radio_color: [f32; 3],
}

/// One shell of background stars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarLayerConfig {
    /// Outer radius of the shell.
    pub radius: f32,
    /// Shell thickness outward from `radius`.
    pub depth: f32,
    pub count: u32,
    /// Point size multiplier.
    pub factor: f32,
    /// Twinkle rate multiplier on the shader clock.
    pub twinkle_speed: f32,
}

/// Starfield backdrop, bloom and vignette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectsConfig {
    /// Seed for star placement; the same seed gives the same sky.
    pub star_seed: u64,
    pub star_layers: Vec<StarLayerConfig>,
    /// Grey level of every star.
    pub star_brightness: f32,
    pub bloom_intensity: f32,
    /// Luminance where bloom starts.
    pub bloom_threshold: f32,
    /// Width of the luminance ramp above the threshold.
    pub bloom_smoothing: f32,
    /// Blur mip levels, each half the size of the one above.
    pub bloom_levels: u32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

/// Item data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// RON list of items. Built-in samples are used when missing.
    pub items_path: PathBuf,
    /// Category shown at start-up (`instruments` or `radio`).
    pub start_category: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            fullscreen: false,
            vsync: true,
            title: "Orbis".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_width_segments: 128,
            sphere_height_segments: 128,
            cloud_width_segments: 64,
            cloud_height_segments: 64,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            target_fps: 0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 42.0,
            near: 0.1,
            far: 1000.0,
            start_azimuth_deg: 90.0,
            start_polar_deg: 90.0,
            start_distance: 5.5,
            min_distance: 3.0,
            max_distance: 8.0,
            min_polar_frac: 0.2,
            max_polar_frac: 0.8,
            damping: 0.03,
            rotate_speed: 0.35,
            zoom_speed: 0.5,
            fly_duration: 1.5,
            fly_distance: 4.5,
            drag_threshold_px: 4.0,
        }
    }
}

impl Default for CloudLayerConfig {
    fn default() -> Self {
        Self {
            offset: 0.02,
            rotation_rate: 0.02,
            opacity: 0.5,
            tilt: [0.0; 3],
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            rotation_rate: 0.015,
            cloud_layers: vec![
                CloudLayerConfig::default(),
                CloudLayerConfig {
                    offset: 0.035,
                    rotation_rate: -0.008,
                    opacity: 0.25,
                    tilt: [0.1, 2.0, 0.0],
                },
            ],
            atmosphere_scale: 1.04,
            inner_glow_offset: 0.01,
            settle_delay_s: 1.0,
            sun_position: [8.0, 3.0, 6.0],
        }
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            day_edges: [-0.25, 0.35],
            night_edges: [0.1, -0.35],
            night_boost: 0.4,
            night_intensity: 1.0,
            terminator_edges: [-0.15, 0.3],
            terminator_color: [1.0, 0.45, 0.2],
            terminator_strength: 0.08,
            sun_color: [1.0, 0.97, 0.94],
            specular_tight_exponent: 96.0,
            specular_tight_strength: 0.6,
            specular_broad_exponent: 12.0,
            specular_broad_strength: 0.12,
            bump_scale: 0.8,
            atmosphere_color: [0.3, 0.6, 1.0],
            fresnel_power: 3.5,
            rim_strength: 0.35,
            rim_night_weight: 0.25,
            ambient: [0.025, 0.03, 0.045],
            exposure: 1.1,
            cloud_ambient: 0.06,
            placeholder_color: [0.024, 0.063, 0.094],
            shell_inner_color: [0.039, 0.290, 0.431],
            shell_outer_color: [0.0, 0.659, 1.0],
            shell_fresnel_power: 3.5,
            shell_intensity: 0.6,
            shell_alpha: 0.35,
            shell_night_weight: 0.3,
            glow_color: [0.0, 0.659, 1.0],
            glow_fresnel_power: 4.0,
            glow_alpha: 0.12,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets/textures"),
            diffuse: PathBuf::from("earth_atmos_2048.jpg"),
            bump: PathBuf::from("earth_normal_2048.jpg"),
            specular: PathBuf::from("earth_specular_2048.jpg"),
            night: PathBuf::from("earth_lights_2048.png"),
            clouds: PathBuf::from("earth_clouds_1024.png"),
            loader_threads: 0,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            surface_offset: 0.005,
            beam_height: 0.25,
            hover_beam_scale: 1.15,
            selected_beam_height: 0.4,
            beam_width: [0.008, 0.01, 0.012],
            beam_opacity: [0.5, 0.7, 0.9],
            dot_size: [0.015, 0.018, 0.022],
            glow_opacity: [0.2, 0.3, 0.4],
            glow_wobble: 0.05,
            breathe_amplitude: 0.03,
            float_amplitude: 0.008,
            base_radius: 0.012,
            hit_radius: 0.04,
            hit_padding: 0.05,
            pulse_period: 2.0,
            pulse_max_radius: 0.08,
            instruments_color: [0.0, 0.659, 1.0],
            radio_color: [0.506, 0.549, 0.973],
        }
    }
}

impl Default for StarLayerConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            depth: 60.0,
            count: 1200,
            factor: 3.0,
            twinkle_speed: 0.1,
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            star_seed: 0x0e1b_15_5eed,
            star_layers: vec![
                StarLayerConfig::default(),
                StarLayerConfig {
                    radius: 200.0,
                    depth: 100.0,
                    count: 800,
                    factor: 5.0,
                    twinkle_speed: 0.05,
                },
            ],
            star_brightness: 0.9,
            bloom_intensity: 0.4,
            bloom_threshold: 0.6,
            bloom_smoothing: 0.9,
            bloom_levels: 5,
            vignette_offset: 0.35,
            vignette_darkness: 0.5,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            items_path: PathBuf::from("assets/items.ron"),
            start_category: "instruments".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TextureConfig {
    /// Resolve a texture file against `directory`.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.directory.join(file)
        }
    }
}

// --- Validation ---

impl Config {
    /// Reject values that would break geometry or clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.globe.radius <= 0.0 {
            return Err(invalid("globe.radius", "must be positive"));
        }
        if self.globe.atmosphere_scale <= 1.0 {
            return Err(invalid("globe.atmosphere_scale", "must be greater than 1"));
        }
        let cam = &self.camera;
        if cam.min_distance <= self.globe.radius || cam.min_distance > cam.max_distance {
            return Err(invalid(
                "camera.min_distance",
                format!(
                    "need radius < min <= max, got {} / {} / {}",
                    self.globe.radius, cam.min_distance, cam.max_distance
                ),
            ));
        }
        if !(0.0..=1.0).contains(&cam.min_polar_frac)
            || !(0.0..=1.0).contains(&cam.max_polar_frac)
            || cam.min_polar_frac > cam.max_polar_frac
        {
            return Err(invalid(
                "camera.min_polar_frac",
                "polar fractions must satisfy 0 <= min <= max <= 1",
            ));
        }
        if !(cam.damping > 0.0 && cam.damping <= 1.0) {
            return Err(invalid("camera.damping", "must be in (0, 1]"));
        }
        if cam.near <= 0.0 || cam.far <= cam.near {
            return Err(invalid("camera.near", "need 0 < near < far"));
        }
        if self.markers.pulse_period <= 0.0 {
            return Err(invalid("markers.pulse_period", "must be positive"));
        }
        if self.render.sphere_width_segments < 3 || self.render.sphere_height_segments < 2 {
            return Err(invalid("render.sphere_width_segments", "sphere too coarse"));
        }
        let fx = &self.effects;
        if !(1..=8).contains(&fx.bloom_levels) {
            return Err(invalid("effects.bloom_levels", "must be in 1..=8"));
        }
        if fx.bloom_smoothing < 0.0 || fx.bloom_intensity < 0.0 {
            return Err(invalid("effects.bloom_smoothing", "bloom settings must not be negative"));
        }
        if let Some(layer) = fx.star_layers.iter().find(|l| l.radius <= 0.0 || l.depth < 0.0) {
            return Err(invalid(
                "effects.star_layers",
                format!("need radius > 0 and depth >= 0, got {} / {}", layer.radius, layer.depth),
            ));
        }
        if let Some(layer) = fx.star_layers.iter().find(|l| l.radius + l.depth > cam.far) {
            return Err(invalid(
                "effects.star_layers",
                format!("stars out to {} lie beyond the far plane {}", layer.radius + layer.depth, cam.far),
            ));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("settle_delay_s"));
        assert!(ron_str.contains("earth_atmos_2048.jpg"));
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_defaults_match_scene() {
        let config = Config::default();
        assert_eq!(config.camera.fov_y_deg, 42.0);
        assert_eq!(config.globe.radius, 2.0);
        assert_eq!(config.globe.rotation_rate, 0.015);
        assert_eq!(config.globe.cloud_layers.len(), 2);
        assert_eq!(config.globe.cloud_layers[1].rotation_rate, -0.008);
        assert_eq!(config.shading.day_edges, [-0.25, 0.35]);
        assert_eq!(config.shading.night_edges, [0.1, -0.35]);
        assert!(config.shading.terminator_strength <= 0.08);
        assert_eq!(config.camera.damping, 0.03);
    }

    #[test]
    fn test_effect_defaults_match_scene() {
        let fx = EffectsConfig::default();
        assert_eq!(fx.star_layers.len(), 2);
        assert_eq!((fx.star_layers[0].radius, fx.star_layers[0].count), (100.0, 1200));
        assert_eq!((fx.star_layers[1].radius, fx.star_layers[1].count), (200.0, 800));
        assert_eq!(fx.star_layers[1].factor, 5.0);
        assert_eq!((fx.bloom_intensity, fx.bloom_threshold), (0.4, 0.6));
        assert_eq!((fx.vignette_offset, fx.vignette_darkness), (0.35, 0.5));
    }

    #[test]
    fn test_validate_rejects_bad_effects() {
        let mut config = Config::default();
        config.effects.bloom_levels = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "effects.bloom_levels",
                ..
            })
        ));

        let mut config = Config::default();
        config.effects.star_layers[0].depth = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.effects.star_layers[1].radius = 2000.0;
        config.effects.star_layers[1].depth = 10.0;
        assert!(config.validate().is_err(), "stars past the far plane");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(window: (), camera: (min_distance: 4.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.shading, ShadingConfig::default());
        assert_eq!(config.camera.min_distance, 4.0);
        assert_eq!(config.camera.max_distance, 8.0);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_distance() {
        let mut config = Config::default();
        config.camera.min_distance = 9.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "camera.min_distance",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_camera_inside_globe() {
        let mut config = Config::default();
        config.camera.min_distance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_polar_and_damping() {
        let mut config = Config::default();
        config.camera.min_polar_frac = 0.9;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.damping = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_texture_paths_resolve_against_directory() {
        let textures = TextureConfig::default();
        assert_eq!(
            textures.resolve(&textures.diffuse),
            PathBuf::from("assets/textures/earth_atmos_2048.jpg")
        );
        let absolute = std::env::temp_dir().join("clouds.png");
        assert_eq!(textures.resolve(&absolute), absolute);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.globe.settle_delay_s = 0.0;
        config.data.start_category = "radio".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.shading.exposure = 1.4;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.shading.exposure), Some(1.4));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
