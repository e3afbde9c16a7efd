//! A single raster surface with a device-pixel-ratio-aware backing store.
//!
//! Surfaces are sized in CSS pixels; the actual pixel buffer is scaled by
//! the device pixel ratio so content stays sharp on high-density
//! displays. All drawing is issued in CSS units through [`Surface::transform`].

use tiny_skia::{Color, Pixmap, Transform};

use crate::error::{EditorError, EditorResult};

/// One raster layer: a pixel buffer plus the CSS footprint it covers.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
    css_width: u32,
    css_height: u32,
    scale: f32,
}

impl Surface {
    /// Allocates a transparent surface of `css_width` x `css_height` CSS
    /// pixels at the given device pixel ratio.
    pub fn new(css_width: u32, css_height: u32, scale: f32) -> EditorResult<Self> {
        let (w, h) = backing_store_size(css_width, css_height, scale);
        let pixmap =
            Pixmap::new(w, h).ok_or(EditorError::SurfaceAllocation { width: w, height: h })?;
        Ok(Self {
            pixmap,
            css_width,
            css_height,
            scale,
        })
    }

    /// Reallocates the backing store for new dimensions, discarding all
    /// pixel content. Callers that need the old content must snapshot it
    /// first and copy it back afterwards.
    pub fn rescale(&mut self, css_width: u32, css_height: u32, scale: f32) -> EditorResult<()> {
        let (w, h) = backing_store_size(css_width, css_height, scale);
        self.pixmap =
            Pixmap::new(w, h).ok_or(EditorError::SurfaceAllocation { width: w, height: h })?;
        self.css_width = css_width;
        self.css_height = css_height;
        self.scale = scale;
        Ok(())
    }

    pub fn css_width(&self) -> u32 {
        self.css_width
    }

    pub fn css_height(&self) -> u32 {
        self.css_height
    }

    /// Device pixel ratio of the backing store.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Backing-store width in device pixels.
    pub fn device_width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Backing-store height in device pixels.
    pub fn device_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The transform that maps CSS-pixel drawing commands onto the
    /// backing store.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Deep copy of the backing store.
    pub fn snapshot(&self) -> Pixmap {
        self.pixmap.clone()
    }

    /// Overwrites the backing store with a previously captured snapshot.
    /// Returns `false` (leaving the surface untouched) when the snapshot
    /// dimensions do not match the current backing store.
    pub(crate) fn restore(&mut self, snapshot: &Pixmap) -> bool {
        if snapshot.width() != self.pixmap.width() || snapshot.height() != self.pixmap.height() {
            return false;
        }
        self.pixmap = snapshot.clone();
        true
    }

    /// Clears the surface to full transparency.
    pub(crate) fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }
}

/// Backing-store resolution for a CSS size: scaled by the device pixel
/// ratio, rounded down, never below one pixel.
fn backing_store_size(css_width: u32, css_height: u32, scale: f32) -> (u32, u32) {
    let w = ((css_width as f32 * scale).floor() as u32).max(1);
    let h = ((css_height as f32 * scale).floor() as u32).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_store_scales_with_dpr() {
        let surface = Surface::new(800, 600, 2.0).unwrap();
        assert_eq!(surface.css_width(), 800);
        assert_eq!(surface.css_height(), 600);
        assert_eq!(surface.device_width(), 1600);
        assert_eq!(surface.device_height(), 1200);
    }

    #[test]
    fn test_zero_css_size_keeps_one_pixel() {
        let surface = Surface::new(0, 0, 1.0).unwrap();
        assert_eq!(surface.device_width(), 1);
        assert_eq!(surface.device_height(), 1);
    }

    #[test]
    fn test_fractional_dpr_rounds_down() {
        let surface = Surface::new(101, 101, 1.5).unwrap();
        assert_eq!(surface.device_width(), 151);
        assert_eq!(surface.device_height(), 151);
    }

    #[test]
    fn test_rescale_discards_content() {
        let mut surface = Surface::new(10, 10, 1.0).unwrap();
        surface.pixmap_mut().fill(Color::BLACK);
        surface.rescale(10, 10, 1.0).unwrap();
        assert!(surface.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_restore_rejects_mismatched_snapshot() {
        let mut surface = Surface::new(10, 10, 1.0).unwrap();
        let small = Pixmap::new(5, 5).unwrap();
        assert!(!surface.restore(&small));
        let matching = Pixmap::new(10, 10).unwrap();
        assert!(surface.restore(&matching));
    }
}
