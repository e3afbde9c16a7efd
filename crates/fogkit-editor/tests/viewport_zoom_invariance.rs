//! Integration tests for cursor-anchored zooming.
//!
//! The world point under the cursor must survive any sequence of wheel
//! zooms at that screen position.

use fogkit_editor::{EditorState, Viewport};
use proptest::prelude::*;

#[test]
fn test_single_zoom_keeps_cursor_anchor() {
    let mut vp = Viewport::new(1200.0, 800.0);
    vp.set_pan(33.0, -47.0);

    let before = vp.screen_to_world(400.0, 300.0);
    vp.zoom_at(400.0, 300.0, 1.0);
    let after = vp.screen_to_world(400.0, 300.0);

    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn test_zoom_sequence_keeps_cursor_anchor() {
    let mut vp = Viewport::new(1200.0, 800.0);
    vp.set_pan(10.0, 20.0);

    let anchor = vp.screen_to_world(640.0, 360.0);
    for delta in [1.0, 1.0, -2.0, 3.0, -1.0, -5.0, 4.0] {
        vp.zoom_at(640.0, 360.0, delta);
        let now = vp.screen_to_world(640.0, 360.0);
        assert!((anchor.x - now.x).abs() < 1e-6);
        assert!((anchor.y - now.y).abs() < 1e-6);
    }
}

#[test]
fn test_zoom_holds_anchor_at_clamp_boundary() {
    let mut vp = Viewport::new(1200.0, 800.0);

    // Drive the zoom far past the upper clamp.
    let anchor = vp.screen_to_world(100.0, 100.0);
    for _ in 0..100 {
        vp.zoom_at(100.0, 100.0, -1.0);
    }
    assert_eq!(vp.zoom(), 4.0);
    let now = vp.screen_to_world(100.0, 100.0);
    assert!((anchor.x - now.x).abs() < 1e-6);
    assert!((anchor.y - now.y).abs() < 1e-6);
}

#[test]
fn test_zoom_never_reaches_zero() {
    let mut vp = Viewport::new(1200.0, 800.0);
    for _ in 0..1000 {
        vp.zoom_at(0.0, 0.0, 10.0);
    }
    assert!(vp.zoom() > 0.0);
    // screen_to_world stays finite.
    let world = vp.screen_to_world(500.0, 500.0);
    assert!(world.x.is_finite() && world.y.is_finite());
}

#[test]
fn test_editor_wheel_zoom_routes_to_viewport() {
    let mut state = EditorState::new().unwrap();
    let before = state.viewport().zoom();
    state.wheel_zoom(200.0, 200.0, -1.0);
    assert!(state.viewport().zoom() > before);
}

proptest! {
    #[test]
    fn prop_zoom_preserves_world_point_under_cursor(
        pan_x in -2000.0..2000.0f64,
        pan_y in -2000.0..2000.0f64,
        screen_x in 0.0..1600.0f64,
        screen_y in 0.0..1000.0f64,
        deltas in proptest::collection::vec(-3.0..3.0f64, 1..12),
    ) {
        let mut vp = Viewport::new(1600.0, 1000.0);
        vp.set_pan(pan_x, pan_y);

        let anchor = vp.screen_to_world(screen_x, screen_y);
        for delta in deltas {
            vp.zoom_at(screen_x, screen_y, delta);
            let now = vp.screen_to_world(screen_x, screen_y);
            prop_assert!((anchor.x - now.x).abs() < 1e-6);
            prop_assert!((anchor.y - now.y).abs() < 1e-6);
        }
    }
}
