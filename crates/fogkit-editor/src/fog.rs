//! Fog region model: polygon authoring, revealed state and hit testing.
//!
//! Regions are identified by their position in the list, not by a stable
//! id. Deleting a region therefore renumbers the revealed set so its
//! indices always point at the regions they were granted for.
//!
//! Authoring state machine for the in-progress region:
//! Empty -> Accumulating -> (Completed | Cancelled).

use std::collections::BTreeSet;

use fogkit_core::{Point, Polygon};
use tracing::debug;

/// Fog regions, the region being authored, and the player's revealed set.
#[derive(Debug, Clone, Default)]
pub struct FogModel {
    regions: Vec<Polygon>,
    pending: Polygon,
    revealed: BTreeSet<usize>,
}

impl FogModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Polygon] {
        &self.regions
    }

    /// The region currently being authored. Empty when idle.
    pub fn pending(&self) -> &Polygon {
        &self.pending
    }

    pub fn revealed(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Appends a vertex to the in-progress region.
    pub fn add_point(&mut self, p: Point) {
        self.pending.push(p);
    }

    /// Closes the in-progress region and appends it to the region list.
    /// Returns `false` (and leaves everything untouched) when the region
    /// has fewer than three vertices.
    pub fn complete(&mut self) -> bool {
        if !self.pending.is_closed_shape() {
            return false;
        }
        let region = std::mem::take(&mut self.pending);
        debug!(vertices = region.len(), index = self.regions.len(), "fog region completed");
        self.regions.push(region);
        true
    }

    /// Discards the in-progress region.
    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    /// Removes the region at `index`, shifting revealed indices above it
    /// down by one and dropping the revealed membership of the region
    /// itself. Returns `false` for an out-of-range index.
    pub fn delete_region(&mut self, index: usize) -> bool {
        if index >= self.regions.len() {
            return false;
        }
        self.regions.remove(index);
        self.revealed = self
            .revealed
            .iter()
            .filter_map(|&i| match i.cmp(&index) {
                std::cmp::Ordering::Less => Some(i),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(i - 1),
            })
            .collect();
        true
    }

    /// Flips the revealed state of one region. Out-of-range indices are
    /// ignored.
    pub fn toggle_reveal(&mut self, index: usize) -> bool {
        if index >= self.regions.len() {
            return false;
        }
        if !self.revealed.insert(index) {
            self.revealed.remove(&index);
        }
        true
    }

    /// Player click: reveals every region containing the point (regions
    /// may overlap, so one click can reveal several). Returns the indices
    /// that contain the point.
    pub fn reveal_at(&mut self, p: &Point) -> Vec<usize> {
        let mut hits = Vec::new();
        for (index, region) in self.regions.iter().enumerate() {
            if region.contains(p) {
                self.revealed.insert(index);
                hits.push(index);
            }
        }
        hits
    }

    /// Drops all regions, the in-progress region and the revealed set.
    pub fn clear_all(&mut self) {
        self.regions.clear();
        self.pending.clear();
        self.revealed.clear();
    }

    /// Re-fogs the map for replay: only the revealed set is emptied.
    pub fn reset_revealed(&mut self) {
        self.revealed.clear();
    }

    /// Replaces the region list (history restore). Revealed indices that
    /// no longer resolve to a region are pruned; revealed state itself is
    /// deliberately not history-tracked.
    pub fn set_regions(&mut self, regions: Vec<Polygon>) {
        self.regions = regions;
        let len = self.regions.len();
        self.revealed.retain(|&i| i < len);
    }

    /// Replaces authored geometry wholesale during an edge-resize drag.
    pub(crate) fn set_authoring(&mut self, regions: Vec<Polygon>, pending: Polygon) {
        self.regions = regions;
        self.pending = pending;
        let len = self.regions.len();
        self.revealed.retain(|&i| i < len);
    }

    /// Full restore when loading a saved map.
    pub fn restore(&mut self, regions: Vec<Polygon>, revealed: impl IntoIterator<Item = usize>) {
        let len = regions.len();
        self.regions = regions;
        self.pending.clear();
        self.revealed = revealed.into_iter().filter(|&i| i < len).collect();
    }

    /// Display label for a region ("Region 1" is index 0).
    pub fn region_label(&self, index: usize) -> String {
        format!("Region {}", index + 1)
    }

    /// World-space anchor for a region's label.
    pub fn label_anchor(&self, index: usize) -> Option<Point> {
        self.regions.get(index)?.centroid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(origin: f64) -> Polygon {
        Polygon::from_points(vec![
            Point::new(origin, origin),
            Point::new(origin + 10.0, origin),
            Point::new(origin + 10.0, origin + 10.0),
            Point::new(origin, origin + 10.0),
        ])
    }

    #[test]
    fn test_complete_requires_three_points() {
        let mut fog = FogModel::new();
        fog.add_point(Point::new(0.0, 0.0));
        fog.add_point(Point::new(10.0, 0.0));
        assert!(!fog.complete());
        assert_eq!(fog.len(), 0);
        assert_eq!(fog.pending().len(), 2);

        fog.add_point(Point::new(10.0, 10.0));
        assert!(fog.complete());
        assert_eq!(fog.len(), 1);
        assert!(fog.pending().is_empty());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut fog = FogModel::new();
        fog.add_point(Point::new(0.0, 0.0));
        fog.cancel();
        assert!(fog.pending().is_empty());
        assert_eq!(fog.len(), 0);
    }

    #[test]
    fn test_delete_renumbers_revealed() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0), square(20.0), square(40.0)]);
        fog.toggle_reveal(1);
        fog.toggle_reveal(2);

        // Deleting the first region shifts both revealed indices down.
        assert!(fog.delete_region(0));
        assert_eq!(fog.revealed().iter().copied().collect::<Vec<_>>(), vec![0, 1]);

        fog.set_regions(vec![square(0.0), square(20.0), square(40.0)]);
        fog.reset_revealed();
        fog.toggle_reveal(1);
        fog.toggle_reveal(2);

        // Deleting a revealed region drops it and reindexes the rest.
        assert!(fog.delete_region(1));
        assert_eq!(fog.revealed().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0)]);
        assert!(!fog.delete_region(5));
        assert_eq!(fog.len(), 1);
    }

    #[test]
    fn test_reveal_at_hits_overlapping_regions() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0), square(5.0), square(40.0)]);
        let hits = fog.reveal_at(&Point::new(7.0, 7.0));
        assert_eq!(hits, vec![0, 1]);
        assert!(fog.is_revealed(0));
        assert!(fog.is_revealed(1));
        assert!(!fog.is_revealed(2));
    }

    #[test]
    fn test_reveal_at_miss() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0)]);
        assert!(fog.reveal_at(&Point::new(100.0, 100.0)).is_empty());
        assert!(fog.revealed().is_empty());
    }

    #[test]
    fn test_set_regions_prunes_stale_revealed() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0), square(20.0)]);
        fog.toggle_reveal(1);
        fog.set_regions(vec![square(0.0)]);
        assert!(fog.revealed().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0)]);
        fog.add_point(Point::new(1.0, 1.0));
        fog.toggle_reveal(0);
        fog.clear_all();
        assert!(fog.is_empty());
        assert!(fog.pending().is_empty());
        assert!(fog.revealed().is_empty());
    }

    #[test]
    fn test_region_labels() {
        let mut fog = FogModel::new();
        fog.set_regions(vec![square(0.0)]);
        assert_eq!(fog.region_label(0), "Region 1");
        assert_eq!(fog.label_anchor(0), Some(Point::new(5.0, 5.0)));
        assert_eq!(fog.label_anchor(3), None);
    }
}
