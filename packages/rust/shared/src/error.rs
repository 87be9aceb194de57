//! Error types for Pure Extracts.
//!
//! Library crates use [`PureExtractsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pure Extracts operations.
#[derive(Debug, thiserror::Error)]
pub enum PureExtractsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to a webhook.
    #[error("network error: {0}")]
    Network(String),

    /// Persisted or received data could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input rejected before any state changed.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A lint suggestion no longer applies to the text it is applied to.
    #[error("lint error: {0}")]
    Lint(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PureExtractsError>;

impl PureExtractsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
