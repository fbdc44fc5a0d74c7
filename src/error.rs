//! Error types shared by the library.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout `glyphrain`.
pub type Result<T> = std::result::Result<T, RainError>;

#[derive(Debug, thiserror::Error)]
pub enum RainError {
    /// There is nothing to draw on, e.g. stdout is not a terminal.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse config file {path}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RainError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
