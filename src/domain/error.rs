//! Error types for the table state crate.
//!
//! This module defines the centralized error type [`TableError`] and a type alias
//! [`Result`] used throughout the crate. Most manager operations are infallible by
//! contract (invalid input degrades to a no-op), so errors only surface from store
//! writes, configuration parsing and preset parsing.

use thiserror::Error;

/// The main error type for table state operations.
///
/// # Examples
///
/// ```
/// use tablestate::TableError;
///
/// fn read_store() -> Result<(), TableError> {
///     Err(TableError::Storage("store is read-only".to_string()))
/// }
///
/// assert!(read_store().is_err());
/// ```
#[derive(Debug, Error)]
pub enum TableError {
    /// Key/value store operation failed.
    ///
    /// Raised by [`crate::storage::KeyValueStore`] implementations when a read or
    /// write cannot be completed, or when a store file is corrupt.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A date range key outside `24h`, `7d`, `30d`, `all`.
    #[error("Unknown date range: {0}")]
    InvalidDateRange(String),
}

/// A specialized `Result` type for table state operations.
pub type Result<T> = std::result::Result<T, TableError>;
