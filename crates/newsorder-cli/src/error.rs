//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Check failure from the library
    #[error("{0}")]
    Check(#[from] newsorder::CheckError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Contract name for check failures, `cli` otherwise
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Check(err) => err.kind(),
            Self::Config { .. } | Self::Io(_) | Self::Json(_) => "cli",
        }
    }
}
