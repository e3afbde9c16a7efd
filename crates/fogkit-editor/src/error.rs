//! Error types for the editor core.

use thiserror::Error;

/// Errors that can occur inside the editor core.
#[derive(Error, Debug)]
pub enum EditorError {
    /// A raster surface could not be allocated at the requested
    /// backing-store resolution.
    #[error("Surface allocation failed for {width}x{height} device pixels")]
    SurfaceAllocation { width: u32, height: u32 },

    /// The map bitmap could not be encoded for persistence or export.
    #[error("Bitmap encoding failed: {0}")]
    BitmapEncode(String),

    /// A persisted map bitmap could not be decoded.
    #[error("Bitmap decoding failed: {0}")]
    BitmapDecode(String),

    /// An error bubbled up from the persistence adapter.
    #[error("Storage error: {0}")]
    Storage(#[from] fogkit_storage::StorageError),
}

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
