//! Raster painting routines for the three canvas layers.
//!
//! Everything here draws in CSS-pixel units; the surface's
//! device-pixel-ratio transform maps the commands onto the backing
//! store. Only the layer manager calls into this module.

use std::collections::BTreeSet;

use fogkit_core::{Point, Polygon};
use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Stroke, StrokeDash,
};

use crate::surface::Surface;

fn parchment_color() -> Color {
    Color::from_rgba8(245, 230, 211, 255)
}
fn grid_line_color() -> Color {
    // Light brown, fits the parchment background.
    Color::from_rgba8(139, 90, 43, 38)
}
fn hidden_region_fill() -> Color {
    Color::from_rgba8(255, 0, 0, 51)
}
fn hidden_region_stroke() -> Color {
    Color::from_rgba8(255, 0, 0, 153)
}
fn revealed_region_fill() -> Color {
    Color::from_rgba8(0, 255, 0, 51)
}
fn revealed_region_stroke() -> Color {
    Color::from_rgba8(0, 255, 0, 153)
}
fn pending_region_color() -> Color {
    Color::from_rgba8(0, 0, 255, 128)
}
fn fog_color() -> Color {
    Color::BLACK
}

/// Builds a polyline path through the polygon's vertices.
fn polygon_path(polygon: &Polygon, close: bool) -> Option<Path> {
    let first = polygon.points.first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &polygon.points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Fills the background with parchment and, when visible, strokes grid
/// lines every `grid_size` CSS pixels from 0 to width/height inclusive.
pub(crate) fn draw_grid(surface: &mut Surface, grid_size: u32, visible: bool) {
    let transform = surface.transform();
    let width = surface.css_width() as f32;
    let height = surface.css_height() as f32;

    surface.pixmap_mut().fill(parchment_color());
    if !visible || grid_size == 0 {
        return;
    }

    let mut pb = PathBuilder::new();
    let step = grid_size as f32;
    let mut x = 0.0;
    while x <= width {
        pb.move_to(x, 0.0);
        pb.line_to(x, height);
        x += step;
    }
    let mut y = 0.0;
    while y <= height {
        pb.move_to(0.0, y);
        pb.line_to(width, y);
        y += step;
    }

    let Some(path) = pb.finish() else { return };

    let mut paint = Paint::default();
    paint.set_color(grid_line_color());
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 0.5,
        ..Default::default()
    };
    surface
        .pixmap_mut()
        .stroke_path(&path, &paint, &stroke, transform, None);
}

/// Strokes a brush segment with round caps and joins. Erasing clears
/// pixels instead of depositing color.
pub(crate) fn draw_brush_stroke(
    surface: &mut Surface,
    from: Point,
    to: Point,
    color: Color,
    size: f64,
    erase: bool,
) {
    let transform = surface.transform();
    let mut pb = PathBuilder::new();
    pb.move_to(from.x as f32, from.y as f32);
    pb.line_to(to.x as f32, to.y as f32);
    let Some(path) = pb.finish() else { return };

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    if erase {
        paint.blend_mode = BlendMode::Clear;
    }
    let stroke = Stroke {
        width: size as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    surface
        .pixmap_mut()
        .stroke_path(&path, &paint, &stroke, transform, None);
}

/// Fills a single round dab, the stroke's starting point.
pub(crate) fn draw_brush_dab(
    surface: &mut Surface,
    center: Point,
    color: Color,
    size: f64,
    erase: bool,
) {
    let transform = surface.transform();
    let Some(path) =
        PathBuilder::from_circle(center.x as f32, center.y as f32, (size / 2.0) as f32)
    else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    if erase {
        paint.blend_mode = BlendMode::Clear;
    }
    surface
        .pixmap_mut()
        .fill_path(&path, &paint, FillRule::Winding, transform, None);
}

/// Draws every fog region outline and translucent fill on the overlay:
/// red while hidden, green once revealed.
pub(crate) fn draw_fog_regions(
    surface: &mut Surface,
    regions: &[Polygon],
    revealed: &BTreeSet<usize>,
) {
    let transform = surface.transform();
    for (index, region) in regions.iter().enumerate() {
        let Some(path) = polygon_path(region, true) else {
            continue;
        };
        let is_revealed = revealed.contains(&index);

        let mut fill = Paint::default();
        fill.set_color(if is_revealed {
            revealed_region_fill()
        } else {
            hidden_region_fill()
        });
        fill.anti_alias = true;

        let mut outline = Paint::default();
        outline.set_color(if is_revealed {
            revealed_region_stroke()
        } else {
            hidden_region_stroke()
        });
        outline.anti_alias = true;

        let stroke = Stroke {
            width: 2.0,
            ..Default::default()
        };
        surface
            .pixmap_mut()
            .fill_path(&path, &fill, FillRule::EvenOdd, transform, None);
        surface
            .pixmap_mut()
            .stroke_path(&path, &outline, &stroke, transform, None);
    }
}

/// Draws the in-progress region as a dashed open polyline.
pub(crate) fn draw_pending_region(surface: &mut Surface, region: &Polygon) {
    let transform = surface.transform();
    let Some(path) = polygon_path(region, false) else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(pending_region_color());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: 2.0,
        dash: StrokeDash::new(vec![5.0, 5.0], 0.0),
        ..Default::default()
    };
    surface
        .pixmap_mut()
        .stroke_path(&path, &paint, &stroke, transform, None);
}

/// Player-view compositing: covers the overlay in opaque fog, then cuts
/// out every revealed region.
pub(crate) fn apply_fog_of_war(
    surface: &mut Surface,
    regions: &[Polygon],
    revealed: &BTreeSet<usize>,
) {
    let transform = surface.transform();
    surface.pixmap_mut().fill(fog_color());

    let mut cutout = Paint::default();
    cutout.set_color(Color::WHITE);
    cutout.anti_alias = true;
    cutout.blend_mode = BlendMode::Clear;

    for index in revealed {
        let Some(region) = regions.get(*index) else {
            continue;
        };
        let Some(path) = polygon_path(region, true) else {
            continue;
        };
        surface
            .pixmap_mut()
            .fill_path(&path, &cutout, FillRule::EvenOdd, transform, None);
    }
}
