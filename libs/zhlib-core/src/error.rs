//! Error types for zhlib-core.

use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a dictionary store.
///
/// Lookup misses are never errors; they come back as `None` or an empty list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dictionary store unavailable: {0}")]
    Unavailable(String),

    #[error("uniqueness conflict: {0}")]
    Conflict(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors that can occur while reading a reference table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
