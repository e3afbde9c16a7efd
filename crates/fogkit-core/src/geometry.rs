//! World-space geometry primitives.
//!
//! All coordinates are CSS pixels in world space: independent of zoom,
//! pan and device pixel ratio. Screen-space conversion lives in the
//! editor's viewport, not here.

use serde::{Deserialize, Serialize};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An ordered sequence of vertices forming an implicitly closed polygon.
///
/// Fog regions are polygons; a region under construction may hold fewer
/// than three vertices and is not yet closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Whether the polygon has enough vertices to enclose area.
    pub fn is_closed_shape(&self) -> bool {
        self.points.len() >= crate::constants::MIN_REGION_POINTS
    }

    /// Even-odd (ray casting) point-in-polygon test.
    ///
    /// Casts a horizontal ray from `p` towards +infinity and counts edge
    /// crossings; an odd count means the point is inside. Degenerate
    /// polygons (fewer than three vertices) contain nothing.
    pub fn contains(&self, p: &Point) -> bool {
        if !self.is_closed_shape() {
            return false;
        }

        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];

            let crosses = (pi.y > p.y) != (pj.y > p.y)
                && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if crosses {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Shifts every vertex by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Vertex average, used to anchor region labels.
    ///
    /// Returns `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        let mut bb = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            bb.0 = bb.0.min(p.x);
            bb.1 = bb.1.min(p.y);
            bb.2 = bb.2.max(p.x);
            bb.3 = bb.3.max(p.y);
        }
        Some(bb)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Snaps `value` to the nearest multiple of `step`.
///
/// A zero step leaves the value untouched.
pub fn snap_to_grid(value: f64, step: u32) -> f64 {
    if step == 0 {
        return value;
    }
    let step = f64::from(step);
    (value / step).round() * step
}
