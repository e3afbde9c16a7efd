//! Integration tests for saving a map to the library and loading it
//! into a fresh session.

use fogkit_editor::{EditorState, Point, PointerButton, Tool};
use fogkit_storage::MapLibrary;

fn library(dir: &tempfile::TempDir) -> MapLibrary {
    MapLibrary::open(dir.path().join("maps.json"))
}

fn build_session() -> EditorState {
    let mut state = EditorState::with_size(800, 600, 1.0).unwrap();
    state.set_grid_size(25);
    state.map_name = "Sunken Crypt".to_string();
    state.notes = "Two secret doors on the east wall.".to_string();

    // Some drawn content.
    state.tool = Tool::Brush;
    state.pointer_down(100.0, 100.0, PointerButton::Primary, false);
    state.pointer_move(180.0, 140.0);
    state.pointer_up();

    // Two fog regions, one revealed.
    state.tool = Tool::FogRegion;
    for (x, y) in [(50.0, 50.0), (150.0, 50.0), (150.0, 150.0), (50.0, 150.0)] {
        state.pointer_down(x, y, PointerButton::Primary, false);
    }
    assert!(state.complete_region());
    for (x, y) in [(300.0, 300.0), (400.0, 300.0), (400.0, 400.0)] {
        state.pointer_down(x, y, PointerButton::Primary, false);
    }
    assert!(state.complete_region());
    state.toggle_reveal(1);

    state
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut lib = library(&dir);

    let session = build_session();
    let id = session.save_to_library(&mut lib, None).unwrap();

    // A fresh session with different defaults.
    let mut restored = EditorState::new().unwrap();
    let lib = library(&dir);
    restored.load_from_library(&lib, id).unwrap();

    assert_eq!(restored.layers().css_width(), 800);
    assert_eq!(restored.layers().css_height(), 600);
    assert_eq!(restored.grid_size(), 25);
    assert_eq!(restored.map_name, "Sunken Crypt");
    assert_eq!(restored.notes, "Two secret doors on the east wall.");
    assert!(restored.show_grid());

    assert_eq!(restored.fog().regions(), session.fog().regions());
    assert_eq!(
        restored.fog().regions()[0].points[0],
        Point::new(50.0, 50.0)
    );
    let revealed: Vec<usize> = restored.fog().revealed().iter().copied().collect();
    assert_eq!(revealed, vec![1]);

    // Drawn content survives the encode/decode round trip: the stroke
    // interior is opaque, untouched canvas stays transparent.
    let stroke_px = restored.layers().map().pixmap().pixel(140, 120).unwrap();
    assert_eq!(stroke_px.alpha(), 255);
    let blank_px = restored.layers().map().pixmap().pixel(700, 500).unwrap();
    assert_eq!(blank_px.alpha(), 0);

    // The loaded map is the new history baseline.
    assert!(!restored.can_undo());
    assert!(!restored.can_redo());
}

#[test]
fn test_save_with_existing_id_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let mut lib = library(&dir);

    let mut session = build_session();
    let id = session.save_to_library(&mut lib, None).unwrap();

    session.notes = "Updated notes".to_string();
    let id2 = session.save_to_library(&mut lib, Some(id)).unwrap();
    assert_eq!(id, id2);
    assert_eq!(lib.maps().len(), 1);
    assert_eq!(lib.get(id).unwrap().notes, "Updated notes");
}

#[test]
fn test_load_missing_map_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library(&dir);
    let mut state = EditorState::new().unwrap();
    assert!(state.load_from_library(&lib, uuid::Uuid::new_v4()).is_err());
}

#[test]
fn test_corrupt_bitmap_surfaces_decode_error() {
    let session = build_session();
    let mut record = session.to_saved_map(None).unwrap();
    record.map_image = "not-base64!!!".to_string();

    let mut state = EditorState::new().unwrap();
    assert!(state.load_saved_map(&record).is_err());
}

#[test]
fn test_library_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut lib = library(&dir);
    let session = build_session();
    let id = session.save_to_library(&mut lib, None).unwrap();
    drop(lib);

    let reopened = library(&dir);
    assert_eq!(reopened.maps().len(), 1);
    assert_eq!(reopened.get(id).unwrap().name, "Sunken Crypt");
    assert_eq!(reopened.get(id).unwrap().cell_size, Some(25));
}
