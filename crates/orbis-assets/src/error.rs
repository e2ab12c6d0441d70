use std::path::PathBuf;

/// Errors produced while loading a texture.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} has zero width or height")]
    ZeroSized { path: PathBuf },

    /// The OS refused to start a decoder thread.
    #[error("failed to spawn texture worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// All workers have exited; no more results will arrive.
    #[error("texture workers disconnected")]
    Disconnected,
}
