//! Wayfarer runner: error types.

use thiserror::Error;
use wayfarer_core::error::DomainError;

/// Startup and runtime errors for the terminal runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or argument is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The engine refused an operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
