//! Structured logging for Orbis.
//!
//! Console output carries an uptime timer and module paths. Debug builds can
//! also write a JSON log for post-mortem analysis. `RUST_LOG` wins over the
//! level stored in the config file.

use std::path::Path;

use orbis_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives used when neither `RUST_LOG` nor the config says otherwise.
pub const DEFAULT_DIRECTIVES: &str = "info,wgpu=warn,naga=warn";

/// File name of the JSON log inside the log directory.
pub const LOG_FILE_NAME: &str = "orbis.log";

/// Build the filter directive string from an optional config.
///
/// A bare level such as `debug` keeps the GPU stack quiet; anything that
/// already names targets is passed through untouched.
pub fn filter_directives(config: Option<&Config>) -> String {
    let level = config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty());

    match level {
        None => DEFAULT_DIRECTIVES.to_string(),
        Some(level) if level.contains('=') || level.contains(',') => level.to_string(),
        Some(level) => format!("{level},wgpu=warn,naga=warn"),
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log (only used when `debug_build`)
/// * `debug_build` - enables the file layer
/// * `config` - source of the `debug.log_level` override
///
/// ```no_run
/// use orbis_config::Config;
/// use orbis_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directives = filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!(dir = %log_dir.display(), "JSON file logging enabled");
        return;
    }

    subscriber.init();
}

/// The default filter, for tests and tools that skip [`init_logging`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_without_config() {
        assert_eq!(filter_directives(None), DEFAULT_DIRECTIVES);
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(filter_directives(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        let mut config = Config::default();
        config.debug.log_level = "warn,orbis_globe=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "warn,orbis_globe=trace");
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directives(Some(&config)), DEFAULT_DIRECTIVES);
    }

    #[test]
    fn test_default_filter_mentions_gpu_targets() {
        let filter_str = default_env_filter().to_string();
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
    }

    #[test]
    fn test_generated_directives_parse() {
        for level in ["error", "info", "trace", "debug,orbis_render=trace"] {
            let mut config = Config::default();
            config.debug.log_level = level.to_string();
            let directives = filter_directives(Some(&config));
            assert!(
                EnvFilter::try_new(&directives).is_ok(),
                "failed to parse {directives}"
            );
        }
    }
}
