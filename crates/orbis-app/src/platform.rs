//! Per-user directories for config and logs.
//!
//! Follows OS conventions through `dirs`: XDG on Linux, Known Folders on
//! Windows, `Library` on macOS.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files in debug builds.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "orbis";

impl PlatformDirs {
    /// Resolve the directories without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let root = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&root))
    }

    /// Lay the directories out under `root`.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            log_dir: app_dir.join("logs"),
            config_dir: app_dir,
        }
    }

    /// Use `config_dir` for the config file, keeping the log location.
    pub fn with_config_dir(mut self, config_dir: PathBuf) -> Self {
        self.config_dir = config_dir;
        self
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("/tmp/root"));
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/root/orbis"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/root/orbis/logs"));
    }

    #[test]
    fn test_create_dirs_under_temp_root() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
        // Idempotent.
        dirs.create_dirs().unwrap();
    }

    #[test]
    fn test_config_dir_override_keeps_others() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        let custom = tmp.path().join("elsewhere");
        let overridden = dirs.clone().with_config_dir(custom.clone());
        assert_eq!(overridden.config_dir, custom);
        assert_eq!(overridden.log_dir, dirs.log_dir);
    }

    #[test]
    fn test_resolved_paths_end_with_app_name() {
        if let Ok(dirs) = PlatformDirs::resolve() {
            assert!(dirs.config_dir.ends_with(APP_NAME));
            assert!(dirs.log_dir.starts_with(&dirs.config_dir));
            let root = dirs::config_dir().unwrap();
            assert_eq!(dirs, PlatformDirs::resolve_with_root(&root));
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
        let io = PlatformError::from(io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
    }
}
