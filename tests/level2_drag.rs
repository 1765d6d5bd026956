//! Level 2: Node Click & Drag Tests
//!
//! Tests node repositioning through the native drag protocol and its
//! interaction with the view transform.

mod common;

use common::harness::CanvasTestHarness;
use slint_workflow_canvas::{
    DragPreview, DropResult, Gesture, Point, PressOutcome, ViewTransform, EMPTY_DRAG_IMAGE,
};

#[test]
fn test_drag_moves_node_by_pointer_delta() {
    let mut harness = CanvasTestHarness::new();

    let preview = harness.drag_node("A", 100.0, 50.0, 5);

    assert_eq!(preview, Some(DragPreview::EMPTY));
    assert_eq!(harness.node_position("A"), Point::new(150.0, 200.0));
    assert_eq!(harness.log.last_drop(), Some(DropResult::Repositioned("A".into())));
}

#[test]
fn test_drag_preview_is_transparent_pixel() {
    let mut harness = CanvasTestHarness::new();
    let preview = harness.drag_node("B", 10.0, 10.0, 1).unwrap();
    assert_eq!(preview.image, EMPTY_DRAG_IMAGE);
    assert!(preview.image.starts_with("data:image/gif;base64,"));
}

#[test]
fn test_drag_only_moves_dragged_node() {
    let mut harness = CanvasTestHarness::demo();
    let before: Vec<(String, Point)> = harness
        .canvas
        .borrow()
        .model()
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), n.position))
        .collect();

    harness.drag_node("3", -200.0, 300.0, 20);

    let canvas = harness.canvas.borrow();
    for (id, position) in before {
        let now = canvas.model().node(&id).unwrap().position;
        if id == "3" {
            assert_eq!(now, position.offset(-200.0, 300.0));
        } else {
            assert_eq!(now, position, "node {id} moved");
        }
    }
}

#[test]
fn test_node_rows_follow_drag() {
    let mut harness = CanvasTestHarness::new();
    harness.drag_node("B", 40.0, -30.0, 2);
    let row = harness.node_row("B");
    assert_eq!((row.x, row.y), (340.0, 120.0));
}

#[test]
fn test_edge_path_follows_dragged_node() {
    let mut harness = CanvasTestHarness::new();
    harness.connect("A", "B");
    let before = harness.edge_row(0).path_commands;

    harness.drag_node("B", 0.0, 100.0, 3);

    let after = harness.edge_row(0).path_commands;
    assert_ne!(before, after);
    assert!(after.as_str().ends_with("300 286"), "{after}");
}

#[test]
fn test_drag_under_zoom_keeps_grab_point() {
    let mut harness = CanvasTestHarness::new();
    harness.canvas.borrow_mut().zoom_in();
    harness.canvas.borrow_mut().zoom_in();
    let scale = harness.canvas.borrow().transform().scale;

    // 100 screen pixels is 100/scale canvas units
    harness.drag_node("A", 100.0, 0.0, 4);

    let moved = harness.node_position("A").x - 50.0;
    assert!((moved - 100.0 / scale).abs() < 1e-3, "moved {moved} at scale {scale}");
}

#[test]
fn test_drag_under_pan() {
    let mut harness = CanvasTestHarness::new();
    harness.canvas.borrow_mut().zoom_out();
    harness.press_drag(Point::new(900.0, 700.0), Point::new(700.0, 600.0), 4);
    assert_eq!(harness.canvas.borrow().transform().x, -200.0);

    harness.drag_node("B", 60.0, 0.0, 3);

    let scale = harness.canvas.borrow().transform().scale;
    let moved = harness.node_position("B").x - 300.0;
    assert!((moved - 60.0 / scale).abs() < 1e-3);
}

#[test]
fn test_drag_over_without_active_drag_changes_nothing() {
    let harness = CanvasTestHarness::new();
    assert!(!harness.canvas.borrow_mut().drag_over(500.0, 500.0));
    assert_eq!(harness.node_position("A"), Point::new(50.0, 150.0));
    assert_eq!(harness.node_position("B"), Point::new(300.0, 150.0));
}

#[test]
fn test_drag_start_on_unknown_node_is_ignored() {
    let harness = CanvasTestHarness::new();
    let mut canvas = harness.canvas.borrow_mut();
    assert!(canvas.node_drag_start("ghost", 100.0, 100.0).is_none());
    assert_eq!(canvas.gesture(), Gesture::Idle);
}

#[test]
fn test_second_drag_start_wins() {
    let harness = CanvasTestHarness::new();
    let mut canvas = harness.canvas.borrow_mut();
    canvas.node_drag_start("A", 110.0, 170.0);
    canvas.node_drag_start("B", 360.0, 170.0);
    canvas.drag_over(400.0, 200.0);

    assert_eq!(canvas.drop_at(400.0, 200.0, None), DropResult::Repositioned("B".into()));
    assert_eq!(canvas.model().node("A").unwrap().position, Point::new(50.0, 150.0));
    assert_eq!(canvas.model().node("B").unwrap().position, Point::new(340.0, 180.0));
}

#[test]
fn test_drop_ends_drag_gesture() {
    let mut harness = CanvasTestHarness::new();
    harness.drag_node("A", 5.0, 5.0, 1);
    assert_eq!(harness.canvas.borrow().gesture(), Gesture::Idle);
    assert_eq!(harness.canvas.borrow().transform(), ViewTransform::IDENTITY);
}

#[test]
fn test_drag_does_not_select() {
    let mut harness = CanvasTestHarness::new();
    harness.drag_node("A", 20.0, 20.0, 2);
    assert!(harness.canvas.borrow().model().selection().is_empty());
}

// ============================================================================
// Abandoned Drags
// ============================================================================

#[test]
fn test_abandoned_drag_does_not_block_panning() {
    let mut harness = CanvasTestHarness::new();
    let start = harness.node_body("A");
    harness.canvas.borrow_mut().node_drag_start("A", start.x, start.y);
    harness.canvas.borrow_mut().drag_over(start.x + 30.0, start.y);
    harness.release(start);

    harness.press_drag(Point::new(700.0, 600.0), Point::new(740.0, 620.0), 2);

    assert_eq!(harness.log.last_press(), Some(PressOutcome::Panning));
    assert_eq!(harness.canvas.borrow().transform(), ViewTransform::new(40.0, 20.0, 1.0));
    assert_eq!(harness.canvas.borrow().gesture(), Gesture::Idle);
    // The last drag-over still counts
    assert_eq!(harness.node_position("A"), Point::new(80.0, 150.0));
}

#[test]
fn test_abandoned_drag_does_not_block_connecting() {
    let mut harness = CanvasTestHarness::new();
    let start = harness.node_body("B");
    harness.canvas.borrow_mut().node_drag_start("B", start.x, start.y);

    harness.connect("A", "B");

    assert!(harness.canvas.borrow().model().contains_edge("A", "B"));
}

#[test]
fn test_cancelled_drag_then_palette_drop_creates_node() {
    let mut harness = CanvasTestHarness::new();
    let start = harness.node_body("A");
    harness.canvas.borrow_mut().node_drag_start("A", start.x, start.y);

    assert!(harness.canvas.borrow_mut().node_drag_end());
    assert_eq!(harness.canvas.borrow().gesture(), Gesture::Idle);

    let text = r#"{"type":"Delay","data":{}}"#;
    let result = harness.canvas.borrow_mut().drop_at(400.0, 236.0, Some(text));
    assert!(matches!(result, DropResult::Created(_)), "{result:?}");
}

