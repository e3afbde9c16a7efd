//! The saved-map record shape.

use chrono::{DateTime, Utc};
use fogkit_core::Polygon;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named map as persisted in the library.
///
/// The bitmap travels as a base64-encoded PNG of the map layer's backing
/// store; `width`/`height` are the CSS-pixel canvas dimensions at save
/// time so a loading session can re-establish its coordinate system
/// before decoding the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMap {
    pub id: Uuid,
    pub name: String,
    pub saved_at: DateTime<Utc>,
    /// Base64-encoded PNG of the map layer.
    pub map_image: String,
    pub fog_regions: Vec<Polygon>,
    /// Revealed region indices in plain array form.
    pub revealed_regions: Vec<usize>,
    pub notes: String,
    pub show_grid: bool,
    pub width: u32,
    pub height: u32,
    /// Grid cell size at save time; `None` when the map predates the
    /// grid-size field and the loader should keep its current setting.
    #[serde(default)]
    pub cell_size: Option<u32>,
}

impl SavedMap {
    /// Creates a record with a fresh id and the current timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        map_image: String,
        fog_regions: Vec<Polygon>,
        revealed_regions: Vec<usize>,
        notes: impl Into<String>,
        show_grid: bool,
        width: u32,
        height: u32,
        cell_size: Option<u32>,
    ) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            name: if name.is_empty() {
                "Untitled Map".to_string()
            } else {
                name
            },
            saved_at: Utc::now(),
            map_image,
            fog_regions,
            revealed_regions,
            notes: notes.into(),
            show_grid,
            width,
            height,
            cell_size,
        }
    }
}
