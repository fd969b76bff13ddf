//! Shared utilities
//!
//! Error types and display formatters used across the crate.

pub mod error;
pub mod format;

pub use error::{AppError, AppResult};
pub use format::{bytes_to_size, format_elapsed_time};
