//! Error types and handling
//!
//! Common error types used across the crate.

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Recording sink error: {0}")]
    Sink(String),

    #[error("Storage estimate error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
