//! Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Errors while loading overlay configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `MaskConfig`
    #[error("invalid overlay config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors surfaced by the async driver
#[derive(Debug, Error)]
pub enum MaskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The driver task has exited (shut down or aborted)
    #[error("overlay driver is no longer running")]
    DriverClosed,
}
