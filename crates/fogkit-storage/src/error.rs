//! Error types for map persistence.

use std::io;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while loading or saving the map library.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The library file could not be written.
    #[error("Failed to save map library: {0}")]
    Save(String),

    /// No saved map with the given id exists in the library.
    #[error("Map not found: {0}")]
    NotFound(Uuid),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
