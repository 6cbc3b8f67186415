//! Error types for kiosk-player
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for kiosk-player
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend fetch failed (network, HTTP status, undecodable body).
    /// Recoverable: retried on the next refresh cycle.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Errors from the shared library
    #[error(transparent)]
    Common(#[from] kiosk_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

/// Convenience Result type using kiosk-player Error
pub type Result<T> = std::result::Result<T, Error>;
