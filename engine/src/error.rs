//! Crate-level error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::physics::PhysicsError;

/// Errors loading or validating a [`FieldConfig`](crate::config::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config JSON is malformed.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which field and why.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by field construction and the frame loop.
///
/// Degenerate geometry never shows up here: zero-length force directions and
/// rays parallel to the projection plane are absorbed where they occur.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for field operations.
pub type FieldResult<T> = Result<T, FieldError>;
