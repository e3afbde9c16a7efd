//! # FogKit Core
//!
//! Core types and utilities shared across the FogKit crates.
//! Provides the world-space geometry primitives (points, polygons,
//! point-in-polygon hit testing) and the constants that bound the
//! editor's coordinate systems (zoom range, canvas size limits, grid
//! defaults).

pub mod constants;
pub mod geometry;

pub use geometry::{Point, Polygon};
