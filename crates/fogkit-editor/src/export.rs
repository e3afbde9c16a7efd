//! PNG export: composites the three layers into one offscreen surface.
//!
//! The overlay is included only for a DM-view export with fog regions
//! visible; a player handout never ships the authoring overlay.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::error::{EditorError, EditorResult};
use crate::layers::LayerStack;

/// Composites background + map (+ overlay) into a single offscreen
/// pixmap at backing-store resolution.
pub fn compose_layers(layers: &LayerStack, include_overlay: bool) -> EditorResult<Pixmap> {
    let width = layers.map().device_width();
    let height = layers.map().device_height();
    let mut out = Pixmap::new(width, height).ok_or(EditorError::SurfaceAllocation {
        width,
        height,
    })?;

    let paint = PixmapPaint::default();
    out.draw_pixmap(
        0,
        0,
        layers.background().pixmap().as_ref(),
        &paint,
        Transform::identity(),
        None,
    );
    out.draw_pixmap(
        0,
        0,
        layers.map().pixmap().as_ref(),
        &paint,
        Transform::identity(),
        None,
    );
    if include_overlay {
        out.draw_pixmap(
            0,
            0,
            layers.overlay().pixmap().as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
    Ok(out)
}

/// Encodes the composited layers as PNG bytes.
pub fn export_png(layers: &LayerStack, dm_view: bool, show_fog_regions: bool) -> EditorResult<Vec<u8>> {
    let composed = compose_layers(layers, dm_view && show_fog_regions)?;
    let img = to_rgba_image(&composed)?;

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| EditorError::BitmapEncode(e.to_string()))?;
    Ok(buf)
}

/// Download filename for an exported map: non-alphanumerics collapse to
/// underscores.
pub fn export_file_name(map_name: &str) -> String {
    let sanitized: String = map_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.chars().all(|c| c == '_') {
        "untitled.png".to_string()
    } else {
        format!("{sanitized}.png")
    }
}

/// Converts a premultiplied pixmap into a straight-alpha RGBA image.
fn to_rgba_image(pixmap: &Pixmap) -> EditorResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| EditorError::BitmapEncode("pixel buffer size mismatch".to_string()))
}
