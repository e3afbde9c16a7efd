//! # FogKit
//!
//! A tabletop-game map editor core: a Dungeon Master draws a map on a
//! layered raster canvas, fences off polygonal fog-of-war regions, and a
//! player view progressively reveals those regions on click.
//!
//! ## Architecture
//!
//! FogKit is organized as a workspace with three crates:
//!
//! 1. **fogkit-core** - Geometry primitives and shared constants
//! 2. **fogkit-editor** - Viewport transform, layered surfaces, fog
//!    regions, snapshot history, export
//! 3. **fogkit-storage** - Saved-map records and the JSON map library
//! 4. **fogkit** - Integration crate that re-exports the public surface
//!
//! The host UI (out of scope here) feeds pointer/wheel input into
//! [`EditorState`] and renders its three surfaces.

pub use fogkit_core::{constants, geometry, Point, Polygon};
pub use fogkit_editor::{
    EdgeDeltas, EditorError, EditorResult, EditorState, FogModel, History, HistoryEntry,
    LayerStack, PointerButton, Surface, Tool, Viewport,
};
pub use fogkit_storage::{MapLibrary, SavedMap, StorageError, StorageResult};

/// Initializes tracing output for the host application.
///
/// Respects `RUST_LOG`, defaulting to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
