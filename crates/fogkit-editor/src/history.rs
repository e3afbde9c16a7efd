//! Linear snapshot history for undo/redo.
//!
//! Each entry pairs a full map-bitmap snapshot with a deep copy of the
//! fog region list and the canvas dimensions at capture time. The step
//! pointer walks the list; a new snapshot truncates everything after the
//! current step before appending.

use fogkit_core::Polygon;
use tiny_skia::Pixmap;
use tracing::debug;

/// Oldest entries are dropped beyond this bound; memory grows linearly
/// with edit count otherwise.
const MAX_ENTRIES: usize = 50;

/// One undoable state: map bitmap, fog regions, canvas size.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    bitmap: Pixmap,
    fog_regions: Vec<Polygon>,
    css_width: u32,
    css_height: u32,
}

impl HistoryEntry {
    pub fn new(bitmap: Pixmap, fog_regions: Vec<Polygon>, css_width: u32, css_height: u32) -> Self {
        Self {
            bitmap,
            fog_regions,
            css_width,
            css_height,
        }
    }

    /// The map layer's backing store at capture time (device pixels).
    pub fn bitmap(&self) -> &Pixmap {
        &self.bitmap
    }

    pub fn fog_regions(&self) -> &[Polygon] {
        &self.fog_regions
    }

    /// Canvas CSS dimensions at capture time.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.css_width, self.css_height)
    }
}

/// Linear undo/redo stack with a step pointer.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    step: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all entries and re-seeds the history with a single baseline
    /// entry (fresh canvas or freshly loaded map).
    pub fn reset(&mut self, baseline: HistoryEntry) {
        self.entries = vec![baseline];
        self.step = 0;
    }

    /// Records a new state: truncates the redo tail, appends, and moves
    /// the step pointer to the new entry. Must be called exactly once per
    /// logical user action.
    pub fn snapshot(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.step + 1);
        self.entries.push(entry);
        self.step = self.entries.len() - 1;

        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
            self.step -= 1;
        }
        debug!(step = self.step, entries = self.entries.len(), "history snapshot");
    }

    /// Steps back and returns the entry to restore, or `None` at the
    /// beginning of history.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.step == 0 || self.entries.is_empty() {
            return None;
        }
        self.step -= 1;
        Some(&self.entries[self.step])
    }

    /// Steps forward and returns the entry to restore, or `None` at the
    /// end of history.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.step + 1 >= self.entries.len() {
            return None;
        }
        self.step += 1;
        Some(&self.entries[self.step])
    }

    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step(&self) -> usize {
        self.step
    }
}
