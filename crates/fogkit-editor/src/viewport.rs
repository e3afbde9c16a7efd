//! Viewport transform: zoom, pan and screen/world coordinate mapping.
//!
//! One affine convention is used everywhere: `screen = world * zoom + pan`,
//! with the pan offset stored in screen pixels. Rendering, hit testing and
//! gesture math all go through this module so the two sides can never
//! disagree.

use fogkit_core::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_SENSITIVITY};
use fogkit_core::Point;

/// Mouse buttons the transform cares about. Anything else is host-UI
/// policy and never reaches the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy)]
struct PanDrag {
    start_mouse: (f64, f64),
    start_pan: (f64, f64),
}

/// Zoom/pan state for the map canvas inside its host container.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    container_width: f64,
    container_height: f64,
    pan_drag: Option<PanDrag>,
}

impl Viewport {
    /// Creates a viewport for a container of the given screen-pixel size.
    pub fn new(container_width: f64, container_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            container_width,
            container_height,
            pan_drag: None,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Updates the host container extent (used by centering and fitting).
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container_width = width;
        self.container_height = height;
    }

    pub fn container_size(&self) -> (f64, f64) {
        (self.container_width, self.container_height)
    }

    /// Converts a screen position (relative to the container origin) to
    /// world coordinates.
    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.pan_x) / self.zoom,
            (screen_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts world coordinates to a screen position relative to the
    /// container origin.
    pub fn world_to_screen(&self, point: &Point) -> (f64, f64) {
        (
            point.x * self.zoom + self.pan_x,
            point.y * self.zoom + self.pan_y,
        )
    }

    /// Wheel zoom at a screen position. The zoom factor follows an
    /// exponential sensitivity curve and the pan offset is recomputed so
    /// the world point under the cursor stays put.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, wheel_delta: f64) {
        let factor = ZOOM_SENSITIVITY.powf(-wheel_delta);
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let anchor = self.screen_to_world(screen_x, screen_y);
        self.zoom = new_zoom;
        self.pan_x = screen_x - anchor.x * new_zoom;
        self.pan_y = screen_y - anchor.y * new_zoom;
    }

    /// Whether a pointer-down starts a pan: middle button, or primary
    /// button with shift held.
    pub fn is_pan_trigger(&self, button: PointerButton, shift: bool) -> bool {
        button == PointerButton::Middle || (button == PointerButton::Primary && shift)
    }

    /// Begins a pan gesture at the given screen position.
    pub fn pan_start(&mut self, screen_x: f64, screen_y: f64) {
        self.pan_drag = Some(PanDrag {
            start_mouse: (screen_x, screen_y),
            start_pan: (self.pan_x, self.pan_y),
        });
    }

    /// Updates an active pan. The offset is always the gesture-start pan
    /// plus the total mouse delta, never an accumulation of per-event
    /// deltas.
    pub fn pan_move(&mut self, screen_x: f64, screen_y: f64) {
        let Some(drag) = self.pan_drag else { return };
        self.pan_x = drag.start_pan.0 + (screen_x - drag.start_mouse.0);
        self.pan_y = drag.start_pan.1 + (screen_y - drag.start_mouse.1);
    }

    /// Ends the pan gesture, if any.
    pub fn pan_end(&mut self) {
        self.pan_drag = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_drag.is_some()
    }

    /// Resets zoom to 1:1 and centers a canvas of the given CSS size in
    /// the container.
    pub fn center_view(&mut self, canvas_width: u32, canvas_height: u32) {
        self.zoom = 1.0;
        self.center_at_current_zoom(canvas_width, canvas_height);
    }

    /// Picks the largest zoom within bounds that shows the whole canvas,
    /// then centers it.
    pub fn fit_to_screen(&mut self, canvas_width: u32, canvas_height: u32) {
        if canvas_width == 0 || canvas_height == 0 {
            return;
        }
        let fit_x = self.container_width / f64::from(canvas_width);
        let fit_y = self.container_height / f64::from(canvas_height);
        self.zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
        self.center_at_current_zoom(canvas_width, canvas_height);
    }

    fn center_at_current_zoom(&mut self, canvas_width: u32, canvas_height: u32) {
        self.pan_x = (self.container_width - f64::from(canvas_width) * self.zoom) / 2.0;
        self.pan_y = (self.container_height - f64::from(canvas_height) * self.zoom) / 2.0;
    }

    /// Back to defaults: 1:1 zoom, no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.pan_drag = None;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            f64::from(fogkit_core::constants::DEFAULT_CANVAS_WIDTH),
            f64::from(fogkit_core::constants::DEFAULT_CANVAS_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.set_zoom(2.0);
        vp.set_pan(37.0, -12.0);
        let world = vp.screen_to_world(400.0, 300.0);
        let (sx, sy) = vp.world_to_screen(&world);
        assert!((sx - 400.0).abs() < 1e-9);
        assert!((sy - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.set_zoom(100.0);
        assert_eq!(vp.zoom(), MAX_ZOOM);
        vp.set_zoom(0.0);
        assert_eq!(vp.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pan_gesture_uses_total_delta() {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.set_pan(10.0, 20.0);
        vp.pan_start(100.0, 100.0);
        vp.pan_move(130.0, 90.0);
        assert_eq!(vp.pan(), (40.0, 10.0));
        // A repeated identical move event must not drift the offset.
        vp.pan_move(130.0, 90.0);
        assert_eq!(vp.pan(), (40.0, 10.0));
        vp.pan_end();
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_pan_move_without_start_is_noop() {
        let mut vp = Viewport::new(1200.0, 800.0);
        vp.pan_move(500.0, 500.0);
        assert_eq!(vp.pan(), (0.0, 0.0));
    }

    #[test]
    fn test_pan_trigger() {
        let vp = Viewport::new(1200.0, 800.0);
        assert!(vp.is_pan_trigger(PointerButton::Middle, false));
        assert!(vp.is_pan_trigger(PointerButton::Primary, true));
        assert!(!vp.is_pan_trigger(PointerButton::Primary, false));
        assert!(!vp.is_pan_trigger(PointerButton::Secondary, true));
    }

    #[test]
    fn test_center_view() {
        let mut vp = Viewport::new(1600.0, 1000.0);
        vp.set_zoom(3.0);
        vp.center_view(1200, 800);
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.pan(), (200.0, 100.0));
    }

    #[test]
    fn test_fit_to_screen_picks_limiting_axis() {
        let mut vp = Viewport::new(600.0, 800.0);
        vp.fit_to_screen(1200, 800);
        // Width is the limiting axis: 600/1200 = 0.5.
        assert!((vp.zoom() - 0.5).abs() < 1e-9);
        let (px, py) = vp.pan();
        assert!((px - 0.0).abs() < 1e-9);
        assert!((py - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_screen_clamps_to_zoom_bounds() {
        let mut vp = Viewport::new(100.0, 100.0);
        vp.fit_to_screen(2000, 2000);
        assert_eq!(vp.zoom(), MIN_ZOOM);

        let mut vp = Viewport::new(10_000.0, 10_000.0);
        vp.fit_to_screen(100, 100);
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }
}
