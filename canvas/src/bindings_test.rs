use super::*;

// Error paths construct a `JsError`, which needs a JS host; only success
// paths are exercised natively.

#[test]
fn payload_json_none_for_ignored_action() {
    assert_eq!(payload_json(Action::None).unwrap(), None);
}

#[test]
fn add_circle_returns_answer_json() {
    let mut canvas = DrawingCanvas::new("encircle").unwrap();
    let json = canvas.add_circle(10.0, 20.0, false).unwrap().unwrap();
    assert_eq!(json, r#"[{"x":10.0,"y":20.0,"radius":30.0,"type":"circle"}]"#);
    assert!(canvas.can_undo());
}

#[test]
fn ignored_call_returns_none() {
    let mut canvas = DrawingCanvas::new("matching").unwrap();
    assert_eq!(canvas.end_line(1.0, 1.0).unwrap(), None);
}

#[test]
fn snapshot_and_restore_round_trip() {
    let mut canvas = DrawingCanvas::new("pattern").unwrap();
    canvas.add_pattern_shape(5.0, 5.0, "triangle").unwrap();
    let saved = canvas.snapshot().unwrap();

    let restored = DrawingCanvas::restore("pattern", &saved).unwrap();
    assert_eq!(restored.answer().unwrap(), canvas.answer().unwrap());
    assert!(!restored.can_undo());
}

#[test]
fn select_tool_toggle_enables_resize() {
    let mut canvas = DrawingCanvas::new("encircle").unwrap();
    canvas.add_circle(50.0, 50.0, false).unwrap();
    canvas.set_select_tool(true);
    assert_eq!(canvas.select_at(50.0, 50.0), Some(0));
    let json = canvas.resize_selected(2.0).unwrap().unwrap();
    assert!(json.contains(r#""radius":10.0"#));
}

#[test]
fn pending_line_tracks_first_click() {
    let mut canvas = DrawingCanvas::new("matching").unwrap();
    assert_eq!(canvas.pending_line(), None);
    canvas.begin_line(12.0, 34.0);
    assert_eq!(canvas.pending_line(), Some(vec![12.0, 34.0]));
    canvas.end_line(50.0, 60.0).unwrap();
    assert_eq!(canvas.pending_line(), None);
}
