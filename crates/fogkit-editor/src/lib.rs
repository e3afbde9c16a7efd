//! # FogKit Editor
//!
//! The map editor core: everything between raw pointer input and pixels.
//!
//! ## Architecture
//!
//! The editor is organized in layers:
//!
//! ```text
//! EditorState (orchestration, tool state, input handling)
//!   ├── Viewport    (zoom/pan, screen <-> world transform)
//!   ├── LayerStack  (background / map / overlay raster surfaces)
//!   │     └── paint (grid, brush, fog compositing)
//!   ├── FogModel    (region authoring, revealed set, hit testing)
//!   └── History     (linear bitmap + region snapshots)
//! ```
//!
//! One affine convention applies everywhere:
//! `screen = world * zoom + pan`, pan in screen pixels. Surfaces are
//! backed by device-pixel buffers scaled by the device pixel ratio, and
//! every drawing command is issued in CSS-pixel units.
//!
//! Persistence and export are the adapter seams: [`EditorState`]
//! produces/consumes [`fogkit_storage::SavedMap`] records and hands the
//! composited layers to the PNG exporter.

pub mod editor;
pub mod error;
pub mod export;
pub mod fog;
pub mod history;
pub mod layers;
pub mod paint;
pub mod surface;
pub mod viewport;

pub use editor::{EditorState, Tool};
pub use error::{EditorError, EditorResult};
pub use fog::FogModel;
pub use history::{History, HistoryEntry};
pub use layers::{EdgeDeltas, LayerStack};
pub use surface::Surface;
pub use viewport::{PointerButton, Viewport};

pub use fogkit_core::{Point, Polygon};
