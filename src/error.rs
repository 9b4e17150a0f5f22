use thiserror::Error;
use std::io;

use crate::retry::RetryError;

/// Custom result type alias for the library
pub type Result<T> = std::result::Result<T, UtilsError>;

/// Errors returned by the loggers, configuration and CLI helpers
#[derive(Debug, Error)]
pub enum UtilsError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Message formatting errors
    #[error("Format error: {0}")]
    Format(String),

    /// Retry executor errors
    #[error(transparent)]
    Retry(#[from] RetryError),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl UtilsError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error came from the underlying sink and may succeed when repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::IO(_))
    }
}
