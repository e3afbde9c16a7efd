//! The JSON-file-backed map library.
//!
//! One file holds the whole collection. Every mutation persists the
//! collection back to disk before returning, so the in-memory list and
//! the file never drift apart.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::record::SavedMap;

/// A collection of saved maps backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct MapLibrary {
    path: PathBuf,
    maps: Vec<SavedMap>,
}

impl MapLibrary {
    /// Opens the library at `path`, loading any existing collection.
    ///
    /// A missing file yields an empty library. A corrupt or unreadable
    /// file is logged and also yields an empty library; the editor must
    /// never see partial records.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let maps = Self::load_collection(&path);
        debug!(maps = maps.len(), path = %path.display(), "opened map library");
        Self { path, maps }
    }

    fn load_collection(path: &Path) -> Vec<SavedMap> {
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(maps) => maps,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "map library is corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read map library, starting empty");
                Vec::new()
            }
        }
    }

    /// The file this library persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved maps, newest last.
    pub fn maps(&self) -> &[SavedMap] {
        &self.maps
    }

    /// Looks up a map by id.
    pub fn get(&self, id: Uuid) -> Option<&SavedMap> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Saves a record, replacing any existing map with the same id, and
    /// persists the collection. Returns the updated collection.
    pub fn save(&mut self, record: SavedMap) -> StorageResult<&[SavedMap]> {
        match self.maps.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => *existing = record,
            None => self.maps.push(record),
        }
        self.persist()?;
        Ok(&self.maps)
    }

    /// Removes the map with the given id and persists the collection.
    /// Unknown ids are a no-op. Returns the updated collection.
    pub fn delete(&mut self, id: Uuid) -> StorageResult<&[SavedMap]> {
        self.maps.retain(|m| m.id != id);
        self.persist()?;
        Ok(&self.maps)
    }

    fn persist(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.maps)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> SavedMap {
        SavedMap::new(name, String::new(), vec![], vec![], "", true, 800, 600, Some(25))
    }

    #[test]
    fn test_missing_file_yields_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let lib = MapLibrary::open(dir.path().join("maps.json"));
        assert!(lib.maps().is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, "{not json").unwrap();
        let lib = MapLibrary::open(&path);
        assert!(lib.maps().is_empty());
    }

    #[test]
    fn test_save_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = MapLibrary::open(dir.path().join("maps.json"));

        let mut map = record("Cave");
        let id = map.id;
        lib.save(map.clone()).unwrap();
        assert_eq!(lib.maps().len(), 1);

        map.name = "Cave (revised)".to_string();
        lib.save(map).unwrap();
        assert_eq!(lib.maps().len(), 1);
        assert_eq!(lib.get(id).unwrap().name, "Cave (revised)");
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = MapLibrary::open(dir.path().join("maps.json"));
        lib.save(record("Keep")).unwrap();
        lib.delete(Uuid::new_v4()).unwrap();
        assert_eq!(lib.maps().len(), 1);
    }
}
