//! Editor orchestration: one state object tying the viewport, layer
//! stack, fog model and history together.
//!
//! Cross-component signals ("complete region", "resize drag ended", ...)
//! are explicit method calls on [`EditorState`], and every logical user
//! action writes at most one history snapshot. The host UI translates
//! raw input into these semantic calls; only the pan trigger and wheel
//! zoom are interpreted here because they feed the transform math.

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use fogkit_core::constants::{
    DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_GRID_SIZE,
};
use fogkit_core::geometry::snap_to_grid;
use fogkit_core::{Point, Polygon};
use fogkit_storage::{MapLibrary, SavedMap};
use tiny_skia::{Color, Pixmap};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};
use crate::export;
use crate::fog::FogModel;
use crate::history::{History, HistoryEntry};
use crate::layers::{EdgeDeltas, LayerStack};
use crate::viewport::{PointerButton, Viewport};

/// Active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Eraser,
    FogRegion,
}

/// Map-bitmap and fog-region snapshot pinned at the start of an
/// edge-resize drag. All deltas within one drag resolve against this,
/// never against the live (already-resized) canvas.
#[derive(Debug, Clone)]
struct ResizeDrag {
    bitmap: Pixmap,
    regions: Vec<Polygon>,
    pending: Polygon,
    base_width: u32,
    base_height: u32,
}

/// The whole editor: layers, transform, fog, history and tool state.
#[derive(Debug, Clone)]
pub struct EditorState {
    layers: LayerStack,
    viewport: Viewport,
    fog: FogModel,
    history: History,

    pub tool: Tool,
    pub brush_size: f64,
    pub brush_color: Color,
    pub notes: String,
    pub map_name: String,
    pub size_locked: bool,
    pub grid_size_locked: bool,

    dm_view: bool,
    show_fog_regions: bool,
    show_grid: bool,
    grid_size: u32,

    stroke_last: Option<Point>,
    resize_drag: Option<ResizeDrag>,
}

impl EditorState {
    /// Creates an editor with the default canvas size at 1x pixel density.
    pub fn new() -> EditorResult<Self> {
        Self::with_size(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, 1.0)
    }

    /// Creates an editor with explicit canvas dimensions and device pixel
    /// ratio. The grid is drawn and the history seeded with the blank
    /// canvas as its baseline entry.
    pub fn with_size(css_width: u32, css_height: u32, device_pixel_ratio: f32) -> EditorResult<Self> {
        let mut layers = LayerStack::new(css_width, css_height, device_pixel_ratio)?;
        layers.redraw_grid(DEFAULT_GRID_SIZE, true);

        let mut state = Self {
            layers,
            viewport: Viewport::new(f64::from(css_width), f64::from(css_height)),
            fog: FogModel::new(),
            history: History::new(),
            tool: Tool::Brush,
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: Color::BLACK,
            notes: String::new(),
            map_name: String::new(),
            size_locked: false,
            grid_size_locked: false,
            dm_view: true,
            show_fog_regions: true,
            show_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
            stroke_last: None,
            resize_drag: None,
        };
        state.reset_history_baseline();
        Ok(state)
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn fog(&self) -> &FogModel {
        &self.fog
    }

    pub fn dm_view(&self) -> bool {
        self.dm_view
    }

    pub fn show_fog_regions(&self) -> bool {
        self.show_fog_regions
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_step(&self) -> usize {
        self.history.step()
    }

    /// Whether a brush/eraser stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.stroke_last.is_some()
    }

    // ---- view / grid settings ------------------------------------------

    /// Switches between DM (authoring) and player (exploration) view.
    pub fn set_dm_view(&mut self, dm_view: bool) {
        self.dm_view = dm_view;
        self.repaint_overlay();
    }

    pub fn set_show_fog_regions(&mut self, show: bool) {
        self.show_fog_regions = show;
        self.repaint_overlay();
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
        self.layers.redraw_grid(self.grid_size, self.show_grid);
    }

    pub fn set_grid_size(&mut self, grid_size: u32) {
        self.grid_size = grid_size.max(1);
        self.layers.redraw_grid(self.grid_size, self.show_grid);
    }

    /// Updates the host container extent used for centering and fitting.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport.set_container_size(width, height);
    }

    /// Rescales all layers for a new device pixel ratio. Map content is
    /// discarded; the caller reloads or redraws afterwards.
    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: f32) -> EditorResult<()> {
        self.layers.set_device_pixel_ratio(device_pixel_ratio)?;
        self.layers.redraw_grid(self.grid_size, self.show_grid);
        self.repaint_overlay();
        Ok(())
    }

    // ---- pointer input -------------------------------------------------

    /// Pointer-down in screen coordinates (relative to the container
    /// origin). Starts a pan for the pan-trigger gesture; otherwise
    /// starts a stroke, adds a fog vertex, or (in player view) reveals
    /// regions under the click.
    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64, button: PointerButton, shift: bool) {
        if self.viewport.is_pan_trigger(button, shift) {
            self.viewport.pan_start(screen_x, screen_y);
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        let world = self.viewport.screen_to_world(screen_x, screen_y);
        if !self.dm_view {
            let hits = self.fog.reveal_at(&world);
            if !hits.is_empty() {
                debug!(?hits, "regions revealed by click");
                self.repaint_overlay();
            }
            return;
        }

        match self.tool {
            Tool::FogRegion => {
                self.fog.add_point(world);
                self.repaint_overlay();
            }
            Tool::Brush | Tool::Eraser => {
                let erase = self.tool == Tool::Eraser;
                self.layers
                    .brush_dab(world, self.brush_color, self.brush_size, erase);
                self.stroke_last = Some(world);
            }
        }
    }

    /// Pointer-move: continues an active pan or stroke; anything else is
    /// ignored.
    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) {
        if self.viewport.is_panning() {
            self.viewport.pan_move(screen_x, screen_y);
            return;
        }
        let Some(last) = self.stroke_last else { return };
        let world = self.viewport.screen_to_world(screen_x, screen_y);
        let erase = self.tool == Tool::Eraser;
        self.layers
            .brush_stroke(last, world, self.brush_color, self.brush_size, erase);
        self.stroke_last = Some(world);
    }

    /// Pointer-up (or pointer-leave): ends pan and stroke. A finished
    /// stroke writes exactly one history entry.
    pub fn pointer_up(&mut self) {
        self.viewport.pan_end();
        if self.stroke_last.take().is_some() {
            self.save_to_history();
        }
    }

    /// Wheel zoom anchored at the cursor.
    pub fn wheel_zoom(&mut self, screen_x: f64, screen_y: f64, wheel_delta: f64) {
        self.viewport.zoom_at(screen_x, screen_y, wheel_delta);
    }

    /// Resets zoom to 1:1 and centers the canvas in its container.
    pub fn center_view(&mut self) {
        self.viewport
            .center_view(self.layers.css_width(), self.layers.css_height());
    }

    /// Fits the whole canvas into the container and centers it.
    pub fn fit_to_screen(&mut self) {
        self.viewport
            .fit_to_screen(self.layers.css_width(), self.layers.css_height());
    }

    // ---- fog region commands -------------------------------------------

    /// Closes the in-progress fog region. No-op (returning `false`) with
    /// fewer than three vertices.
    pub fn complete_region(&mut self) -> bool {
        if !self.fog.complete() {
            return false;
        }
        self.repaint_overlay();
        self.save_to_history();
        true
    }

    /// Discards the in-progress fog region. Never writes history.
    pub fn cancel_region(&mut self) {
        self.fog.cancel();
        self.repaint_overlay();
    }

    /// Deletes a fog region and renumbers the revealed set.
    pub fn delete_region(&mut self, index: usize) -> bool {
        if !self.fog.delete_region(index) {
            return false;
        }
        self.repaint_overlay();
        self.save_to_history();
        true
    }

    /// Flips one region's revealed state. Revealed state is player
    /// progress, not authored content, so this never writes history.
    pub fn toggle_reveal(&mut self, index: usize) -> bool {
        if !self.fog.toggle_reveal(index) {
            return false;
        }
        self.repaint_overlay();
        true
    }

    /// Drops all fog regions and revealed state.
    pub fn clear_fog_regions(&mut self) {
        self.fog.clear_all();
        self.repaint_overlay();
        self.save_to_history();
    }

    /// Re-fogs the map for replay; regions stay, reveals reset.
    pub fn reset_revealed(&mut self) {
        self.fog.reset_revealed();
        self.repaint_overlay();
    }

    // ---- map content ---------------------------------------------------

    /// Clears the map layer to a blank canvas.
    pub fn clear_map(&mut self) {
        self.layers.clear_map();
        self.save_to_history();
    }

    // ---- history -------------------------------------------------------

    fn current_entry(&self) -> HistoryEntry {
        HistoryEntry::new(
            self.layers.map_snapshot(),
            self.fog.regions().to_vec(),
            self.layers.css_width(),
            self.layers.css_height(),
        )
    }

    fn reset_history_baseline(&mut self) {
        let entry = self.current_entry();
        self.history.reset(entry);
    }

    fn save_to_history(&mut self) {
        let entry = self.current_entry();
        self.history.snapshot(entry);
    }

    /// Steps back one history entry, restoring bitmap, fog regions and
    /// canvas dimensions. Returns `false` at the beginning of history.
    pub fn undo(&mut self) -> EditorResult<bool> {
        let Some(entry) = self.history.undo().cloned() else {
            return Ok(false);
        };
        self.apply_history_entry(entry)?;
        Ok(true)
    }

    /// Steps forward one history entry. Returns `false` at the end.
    pub fn redo(&mut self) -> EditorResult<bool> {
        let Some(entry) = self.history.redo().cloned() else {
            return Ok(false);
        };
        self.apply_history_entry(entry)?;
        Ok(true)
    }

    fn apply_history_entry(&mut self, entry: HistoryEntry) -> EditorResult<()> {
        let (w, h) = entry.dimensions();
        if (w, h) != (self.layers.css_width(), self.layers.css_height()) {
            self.layers.rescale_all(w, h)?;
        }
        if !self.layers.restore_map(entry.bitmap()) {
            // Backing stores can only disagree after a pixel-density
            // change; fall back to a scaled draw.
            self.layers.blit_map_scaled(entry.bitmap());
        }
        self.layers.redraw_grid(self.grid_size, self.show_grid);
        self.fog.set_regions(entry.fog_regions().to_vec());
        self.repaint_overlay();
        Ok(())
    }

    // ---- resizing ------------------------------------------------------

    /// Explicit numeric resize. Map content is discarded; dimensions are
    /// snapped when the size lock is on and clamped to the maximum bound.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> EditorResult<(u32, u32)> {
        let applied = self.layers.resize_canvas(
            width,
            height,
            self.size_locked,
            self.grid_size,
            self.show_grid,
        )?;
        self.repaint_overlay();
        self.save_to_history();
        Ok(applied)
    }

    /// One move event of an edge-drag resize, with deltas in screen
    /// pixels measured from drag start. The first call pins the bitmap
    /// and fog snapshot; every later call resolves against that snapshot
    /// and the drag-start dimensions so repeated small deltas cannot
    /// compound.
    pub fn resize_edge_update(&mut self, screen_deltas: EdgeDeltas) -> EditorResult<()> {
        if self.resize_drag.is_none() {
            self.resize_drag = Some(ResizeDrag {
                bitmap: self.layers.map_snapshot(),
                regions: self.fog.regions().to_vec(),
                pending: self.fog.pending().clone(),
                base_width: self.layers.css_width(),
                base_height: self.layers.css_height(),
            });
            debug!("edge resize drag started");
        }

        let zoom = self.viewport.zoom();
        let grid = self.grid_size;
        let snap = |screen: f64| snap_to_grid(screen / zoom, grid);
        let deltas = EdgeDeltas {
            add_left: snap(screen_deltas.add_left),
            add_top: snap(screen_deltas.add_top),
            add_right: snap(screen_deltas.add_right),
            add_bottom: snap(screen_deltas.add_bottom),
        };

        let Some(drag) = self.resize_drag.as_ref() else {
            return Ok(());
        };
        let base = (drag.base_width, drag.base_height);
        self.layers.apply_edge_resize(
            &drag.bitmap,
            base,
            deltas,
            self.size_locked,
            self.grid_size,
            self.show_grid,
        )?;

        // Regions stay anchored to the bitmap content: pure translation,
        // resolved from the drag-start snapshot.
        let mut regions = drag.regions.clone();
        let mut pending = drag.pending.clone();
        for region in &mut regions {
            region.translate(deltas.add_left, deltas.add_top);
        }
        pending.translate(deltas.add_left, deltas.add_top);
        self.fog.set_authoring(regions, pending);
        self.repaint_overlay();
        Ok(())
    }

    /// Ends an edge-drag resize: the snapshot is cleared unconditionally
    /// and one consolidated history entry is written if a drag was
    /// active.
    pub fn resize_edge_end(&mut self) -> bool {
        if self.resize_drag.take().is_none() {
            return false;
        }
        self.save_to_history();
        true
    }

    // ---- overlay -------------------------------------------------------

    fn repaint_overlay(&mut self) {
        if self.dm_view {
            self.layers.repaint_overlay_dm(
                self.fog.regions(),
                self.fog.revealed(),
                self.fog.pending(),
                self.show_fog_regions,
            );
        } else {
            self.layers
                .repaint_overlay_player(self.fog.regions(), self.fog.revealed());
        }
    }

    // ---- persistence ---------------------------------------------------

    /// Builds a saved-map record from the current state. Passing an
    /// existing id overwrites that library entry on save; `None` mints a
    /// fresh id.
    pub fn to_saved_map(&self, existing_id: Option<Uuid>) -> EditorResult<SavedMap> {
        let png = self
            .layers
            .map()
            .pixmap()
            .encode_png()
            .map_err(|e| EditorError::BitmapEncode(e.to_string()))?;
        let mut record = SavedMap::new(
            self.map_name.clone(),
            BASE64.encode(png),
            self.fog.regions().to_vec(),
            self.fog.revealed().iter().copied().collect(),
            self.notes.clone(),
            self.show_grid,
            self.layers.css_width(),
            self.layers.css_height(),
            Some(self.grid_size),
        );
        if let Some(id) = existing_id {
            record.id = id;
        }
        Ok(record)
    }

    /// Restores a saved map. Canvas dimensions and grid cell size are
    /// re-established *before* the bitmap is decoded and drawn so the
    /// coordinate systems agree; fog regions, revealed indices, notes and
    /// name follow. The history is re-seeded with the loaded state.
    pub fn load_saved_map(&mut self, map: &SavedMap) -> EditorResult<()> {
        if let Some(cell) = map.cell_size {
            self.grid_size = cell.max(1);
        }
        self.show_grid = map.show_grid;
        self.layers
            .resize_canvas(map.width, map.height, false, self.grid_size, self.show_grid)?;

        if !map.map_image.is_empty() {
            let bytes = BASE64
                .decode(&map.map_image)
                .map_err(|e| EditorError::BitmapDecode(e.to_string()))?;
            let bitmap =
                Pixmap::decode_png(&bytes).map_err(|e| EditorError::BitmapDecode(e.to_string()))?;
            self.layers.blit_map_scaled(&bitmap);
        }

        self.fog
            .restore(map.fog_regions.clone(), map.revealed_regions.iter().copied());
        self.notes = map.notes.clone();
        self.map_name = map.name.clone();
        self.repaint_overlay();
        self.reset_history_baseline();
        info!(name = %self.map_name, width = map.width, height = map.height, "map loaded");
        Ok(())
    }

    /// Saves the current map into a library, replacing `existing_id` if
    /// given.
    pub fn save_to_library(
        &self,
        library: &mut MapLibrary,
        existing_id: Option<Uuid>,
    ) -> anyhow::Result<Uuid> {
        let record = self
            .to_saved_map(existing_id)
            .context("failed to build saved-map record")?;
        let id = record.id;
        library.save(record).context("failed to persist map library")?;
        info!(%id, "map saved to library");
        Ok(id)
    }

    /// Loads a map from a library by id.
    pub fn load_from_library(&mut self, library: &MapLibrary, id: Uuid) -> anyhow::Result<()> {
        let record = library
            .get(id)
            .ok_or(fogkit_storage::StorageError::NotFound(id))?;
        self.load_saved_map(record)
            .with_context(|| format!("failed to load map {id}"))
    }

    // ---- export --------------------------------------------------------

    /// Encodes the composited layers as PNG bytes. The overlay is
    /// included only in DM view with fog regions visible.
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        export::export_png(&self.layers, self.dm_view, self.show_fog_regions)
    }

    /// Download filename for the current map.
    pub fn export_file_name(&self) -> String {
        export::export_file_name(&self.map_name)
    }
}
