//! The three-layer canvas stack: background/grid, persistent map bitmap,
//! transient overlay.
//!
//! The stack is the sole owner of its surfaces. Other components never
//! hold a surface handle; they request draw operations here (or through
//! the editor), which keeps every mutation serialized in one place. All
//! three surfaces always share the same CSS size and device pixel ratio.

use std::collections::BTreeSet;

use fogkit_core::constants::{MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};
use fogkit_core::geometry::snap_to_grid;
use fogkit_core::{Point, Polygon};
use tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};
use tracing::debug;

use crate::error::EditorResult;
use crate::paint;
use crate::surface::Surface;

/// Per-edge growth of an edge-drag resize. Positive values grow the
/// canvas on that side; negative values shrink it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeDeltas {
    pub add_left: f64,
    pub add_top: f64,
    pub add_right: f64,
    pub add_bottom: f64,
}

impl EdgeDeltas {
    pub fn left(amount: f64) -> Self {
        Self {
            add_left: amount,
            ..Self::default()
        }
    }

    pub fn top(amount: f64) -> Self {
        Self {
            add_top: amount,
            ..Self::default()
        }
    }

    pub fn right(amount: f64) -> Self {
        Self {
            add_right: amount,
            ..Self::default()
        }
    }

    pub fn bottom(amount: f64) -> Self {
        Self {
            add_bottom: amount,
            ..Self::default()
        }
    }
}

/// The stacked background, map and overlay surfaces.
#[derive(Debug, Clone)]
pub struct LayerStack {
    background: Surface,
    map: Surface,
    overlay: Surface,
}

impl LayerStack {
    pub fn new(css_width: u32, css_height: u32, device_pixel_ratio: f32) -> EditorResult<Self> {
        Ok(Self {
            background: Surface::new(css_width, css_height, device_pixel_ratio)?,
            map: Surface::new(css_width, css_height, device_pixel_ratio)?,
            overlay: Surface::new(css_width, css_height, device_pixel_ratio)?,
        })
    }

    pub fn css_width(&self) -> u32 {
        self.map.css_width()
    }

    pub fn css_height(&self) -> u32 {
        self.map.css_height()
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.map.scale()
    }

    /// Background layer, read-only (export compositing).
    pub fn background(&self) -> &Surface {
        &self.background
    }

    /// Map bitmap layer, read-only (export compositing).
    pub fn map(&self) -> &Surface {
        &self.map
    }

    /// Overlay layer, read-only (export compositing).
    pub fn overlay(&self) -> &Surface {
        &self.overlay
    }

    /// Rescales all three surfaces to a new CSS size, discarding content.
    pub fn rescale_all(&mut self, css_width: u32, css_height: u32) -> EditorResult<()> {
        let scale = self.device_pixel_ratio();
        self.background.rescale(css_width, css_height, scale)?;
        self.map.rescale(css_width, css_height, scale)?;
        self.overlay.rescale(css_width, css_height, scale)?;
        Ok(())
    }

    /// Changes the device pixel ratio, rescaling all three backing
    /// stores identically. Map content is discarded; callers reload or
    /// redraw afterwards.
    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: f32) -> EditorResult<()> {
        let (w, h) = (self.css_width(), self.css_height());
        self.background.rescale(w, h, device_pixel_ratio)?;
        self.map.rescale(w, h, device_pixel_ratio)?;
        self.overlay.rescale(w, h, device_pixel_ratio)?;
        Ok(())
    }

    /// Repaints the background layer: parchment plus optional grid.
    pub fn redraw_grid(&mut self, grid_size: u32, visible: bool) {
        paint::draw_grid(&mut self.background, grid_size, visible);
    }

    /// Explicit numeric resize: snap when the size lock is on, clamp to
    /// the maximum bound, rescale everything (map content is discarded)
    /// and redraw the grid. Returns the dimensions actually applied.
    pub fn resize_canvas(
        &mut self,
        width: u32,
        height: u32,
        size_locked: bool,
        grid_size: u32,
        grid_visible: bool,
    ) -> EditorResult<(u32, u32)> {
        let (mut w, mut h) = (f64::from(width), f64::from(height));
        if size_locked {
            w = snap_to_grid(w, grid_size);
            h = snap_to_grid(h, grid_size);
        }
        let w = (w.round() as i64).clamp(1, i64::from(MAX_CANVAS_SIZE)) as u32;
        let h = (h.round() as i64).clamp(1, i64::from(MAX_CANVAS_SIZE)) as u32;

        self.rescale_all(w, h)?;
        self.redraw_grid(grid_size, grid_visible);
        debug!(width = w, height = h, "canvas resized");
        Ok((w, h))
    }

    /// Edge-drag resize against a drag-start snapshot.
    ///
    /// `snapshot` is the map layer's backing store captured at drag
    /// start, `base` the CSS dimensions at drag start. `deltas` must
    /// already be grid-snapped world pixels relative to `base` — never to
    /// the live canvas, so repeated move events cannot compound. Existing
    /// content is copied into the resized surface: a positive left/top
    /// delta shifts it right/down, a negative one crops the snapshot's
    /// corresponding edge. Returns the applied dimensions.
    pub fn apply_edge_resize(
        &mut self,
        snapshot: &Pixmap,
        base: (u32, u32),
        deltas: EdgeDeltas,
        size_locked: bool,
        grid_size: u32,
        grid_visible: bool,
    ) -> EditorResult<(u32, u32)> {
        let mut target_w = f64::from(base.0) + deltas.add_left + deltas.add_right;
        let mut target_h = f64::from(base.1) + deltas.add_top + deltas.add_bottom;
        if size_locked {
            target_w = snap_to_grid(target_w, grid_size);
            target_h = snap_to_grid(target_h, grid_size);
        }
        let w = (target_w.round() as i64)
            .clamp(i64::from(MIN_CANVAS_SIZE), i64::from(MAX_CANVAS_SIZE)) as u32;
        let h = (target_h.round() as i64)
            .clamp(i64::from(MIN_CANVAS_SIZE), i64::from(MAX_CANVAS_SIZE)) as u32;

        self.rescale_all(w, h)?;

        // Destination offset in device pixels. Negative offsets crop the
        // snapshot's left/top edge; positive offsets leave a fresh margin.
        let scale = self.device_pixel_ratio();
        let dx = (deltas.add_left * f64::from(scale)).round() as i32;
        let dy = (deltas.add_top * f64::from(scale)).round() as i32;
        let copy = PixmapPaint {
            opacity: 1.0,
            blend_mode: BlendMode::Source,
            quality: FilterQuality::Nearest,
        };
        self.map
            .pixmap_mut()
            .draw_pixmap(dx, dy, snapshot.as_ref(), &copy, Transform::identity(), None);

        self.redraw_grid(grid_size, grid_visible);
        debug!(width = w, height = h, dx, dy, "edge resize applied");
        Ok((w, h))
    }

    /// Paints a round dab on the map layer (stroke start).
    pub fn brush_dab(&mut self, center: Point, color: Color, size: f64, erase: bool) {
        paint::draw_brush_dab(&mut self.map, center, color, size, erase);
    }

    /// Paints a stroke segment on the map layer.
    pub fn brush_stroke(&mut self, from: Point, to: Point, color: Color, size: f64, erase: bool) {
        paint::draw_brush_stroke(&mut self.map, from, to, color, size, erase);
    }

    /// Clears the map layer to transparency.
    pub fn clear_map(&mut self) {
        self.map.clear();
    }

    /// Deep copy of the map layer's backing store.
    pub fn map_snapshot(&self) -> Pixmap {
        self.map.snapshot()
    }

    /// Restores the map layer from a snapshot with matching backing-store
    /// dimensions. Returns `false` if the dimensions do not match.
    pub fn restore_map(&mut self, snapshot: &Pixmap) -> bool {
        self.map.restore(snapshot)
    }

    /// Replaces the map layer with a decoded bitmap. A bitmap matching
    /// the backing store is copied verbatim; anything else is scaled to
    /// fit (saved maps may have been captured at a different device
    /// pixel ratio).
    pub fn blit_map_scaled(&mut self, bitmap: &Pixmap) {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return;
        }
        if self.map.restore(bitmap) {
            return;
        }
        let sx = self.map.device_width() as f32 / bitmap.width() as f32;
        let sy = self.map.device_height() as f32 / bitmap.height() as f32;
        let copy = PixmapPaint {
            opacity: 1.0,
            blend_mode: BlendMode::Source,
            quality: FilterQuality::Bilinear,
        };
        self.map.pixmap_mut().draw_pixmap(
            0,
            0,
            bitmap.as_ref(),
            &copy,
            Transform::from_scale(sx, sy),
            None,
        );
    }

    /// DM-view overlay: fog region outlines (when shown) plus the
    /// in-progress region.
    pub fn repaint_overlay_dm(
        &mut self,
        regions: &[Polygon],
        revealed: &BTreeSet<usize>,
        pending: &Polygon,
        show_fog_regions: bool,
    ) {
        self.overlay.clear();
        if show_fog_regions {
            paint::draw_fog_regions(&mut self.overlay, regions, revealed);
        }
        paint::draw_pending_region(&mut self.overlay, pending);
    }

    /// Player-view overlay: opaque fog with revealed regions cut out.
    pub fn repaint_overlay_player(&mut self, regions: &[Polygon], revealed: &BTreeSet<usize>) {
        self.overlay.clear();
        paint::apply_fog_of_war(&mut self.overlay, regions, revealed);
    }
}
