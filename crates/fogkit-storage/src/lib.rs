//! # FogKit Storage
//!
//! Persistence adapter for the map editor: owns the saved-map record
//! shape and a JSON-file-backed library of named maps. The editor core
//! produces and consumes [`SavedMap`] records; everything about how they
//! are stored on disk lives here.
//!
//! A map library is a single JSON file holding the full collection, the
//! durable-local-storage analogue of the browser original. Corrupt or
//! unreadable library files degrade to an empty collection rather than
//! failing the application.

pub mod error;
pub mod library;
pub mod record;

pub use error::{StorageError, StorageResult};
pub use library::MapLibrary;
pub use record::SavedMap;
