//! The `orbis` binary: resolve directories, load config and items, open
//! the globe window.

use std::process::ExitCode;

use clap::Parser;
use orbis_app::items::load_or_builtin;
use orbis_app::platform::PlatformDirs;
use orbis_app::window::{self, ReloadSource};
use orbis_config::{CliArgs, Config};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let mut dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &args.config {
        dirs = dirs.with_config_dir(dir.clone());
    }
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    // Logging wants the config, so a load failure is reported after init.
    let (mut config, load_error) = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    orbis_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    }
    info!(
        config = %dirs.config_dir.display(),
        logs = %dirs.log_dir.display(),
        "Orbis starting"
    );

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let items = load_or_builtin(&config.data.items_path);
    let reload = ReloadSource {
        config_dir: dirs.config_dir,
        args,
    };
    match window::run(config, items, reload) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
