//! Common error types for tuneful

use thiserror::Error;

/// Common result type for tuneful operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the resource store, blob store and configuration layer
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blob key that sanitizes to nothing usable
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}
