//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Interactive 3D globe viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the globe textures.
    #[arg(long)]
    pub textures: Option<PathBuf>,

    /// RON file with the items to place on the globe.
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// Category shown at start-up (instruments, radio).
    #[arg(long)]
    pub category: Option<String>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.textures {
            self.textures.directory = dir.clone();
        }
        if let Some(ref path) = args.items {
            self.data.items_path = path.clone();
        }
        if let Some(ref category) = args.category {
            self.data.start_category = category.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            textures: Some(PathBuf::from("/srv/earth")),
            category: Some("radio".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.textures.directory, PathBuf::from("/srv/earth"));
        assert_eq!(config.data.start_category, "radio");
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 800);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orbis",
            "--height",
            "600",
            "--log-level",
            "debug",
            "--items",
            "data/items.ron",
        ]);
        assert_eq!(args.height, Some(600));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.items, Some(PathBuf::from("data/items.ron")));
        assert!(args.width.is_none());
    }
}
