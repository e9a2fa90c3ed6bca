#![allow(clippy::float_cmp)]

use super::*;
use crate::answer::CircleAnswer;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn encircle() -> DrawingSession {
    DrawingSession::new(Mode::Encircle)
}

fn payload_of(action: Action) -> AnswerPayload {
    match action {
        Action::AnswerChanged(p) => p,
        Action::None => panic!("expected AnswerChanged"),
    }
}

fn draw_line(s: &mut DrawingSession, x1: f64, y1: f64, x2: f64, y2: f64) -> Action {
    s.begin_line(pt(x1, y1));
    s.end_line(pt(x2, y2))
}

// =============================================================
// Mode parsing
// =============================================================

#[test]
fn mode_parse_known_and_unknown() {
    assert_eq!(Mode::parse("encircle"), Some(Mode::Encircle));
    assert_eq!(Mode::parse("matching"), Some(Mode::Matching));
    assert_eq!(Mode::parse("pattern"), Some(Mode::Pattern));
    assert_eq!(Mode::parse("drawing"), None);
}

// =============================================================
// add_circle
// =============================================================

#[test]
fn add_circle_uses_default_radius_and_emits_payload() {
    let mut s = encircle();
    let payload = payload_of(s.add_circle(pt(100.0, 120.0), false));
    assert_eq!(
        payload,
        AnswerPayload::Encircle(vec![CircleAnswer {
            x: 100.0,
            y: 120.0,
            radius: Some(30.0),
            kind: Some(crate::answer::EnclosureKind::Circle),
            radius_x: None,
            radius_y: None,
        }])
    );
    assert!(s.can_undo());
}

#[test]
fn add_oval_uses_default_radii() {
    let mut s = encircle();
    s.add_circle(pt(5.0, 5.0), true);
    assert_eq!(
        s.collections().circles[0],
        Enclosure::Oval(Oval { x: 5.0, y: 5.0, radius_x: 40.0, radius_y: 25.0 })
    );
}

#[test]
fn add_circle_ignored_with_select_tool() {
    let mut s = encircle();
    s.set_tool(Tool::Select);
    assert_eq!(s.add_circle(pt(1.0, 1.0), false), Action::None);
    assert!(s.collections().circles.is_empty());
    assert!(!s.can_undo());
}

#[test]
fn add_circle_ignored_outside_encircle() {
    let mut s = DrawingSession::new(Mode::Pattern);
    assert_eq!(s.add_circle(pt(1.0, 1.0), false), Action::None);
    assert!(s.collections().circles.is_empty());
}

#[test]
fn new_mutation_clears_redo() {
    let mut s = encircle();
    s.add_circle(pt(1.0, 1.0), false);
    s.undo();
    assert!(s.can_redo());
    s.add_circle(pt(2.0, 2.0), false);
    assert!(!s.can_redo());
}

// =============================================================
// add_pattern_shape
// =============================================================

#[test]
fn add_pattern_shape_in_pattern_mode() {
    let mut s = DrawingSession::new(Mode::Pattern);
    let payload = payload_of(s.add_pattern_shape(pt(10.0, 20.0), ShapeKind::Triangle));
    assert_eq!(
        payload,
        AnswerPayload::Pattern(vec![PatternShape { x: 10.0, y: 20.0, kind: ShapeKind::Triangle, size: 25.0 }])
    );
}

#[test]
fn add_pattern_shape_ignored_in_encircle() {
    let mut s = encircle();
    assert_eq!(s.add_pattern_shape(pt(1.0, 1.0), ShapeKind::Square), Action::None);
}

// =============================================================
// Lines
// =============================================================

#[test]
fn end_line_without_begin_is_noop() {
    let mut s = DrawingSession::new(Mode::Matching);
    assert_eq!(s.end_line(pt(1.0, 1.0)), Action::None);
    assert!(s.collections().lines.is_empty());
}

#[test]
fn line_records_both_endpoints() {
    let mut s = DrawingSession::new(Mode::Matching);
    draw_line(&mut s, 1.0, 2.0, 3.0, 4.0);
    assert_eq!(s.collections().lines[0].points, [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(s.pending_line(), None);
}

#[test]
fn begin_line_ignored_outside_matching() {
    let mut s = encircle();
    s.begin_line(pt(1.0, 1.0));
    assert_eq!(s.pending_line(), None);
}

#[test]
fn cancel_line_drops_pending_start() {
    let mut s = DrawingSession::new(Mode::Matching);
    s.begin_line(pt(1.0, 1.0));
    s.cancel_line();
    assert_eq!(s.end_line(pt(2.0, 2.0)), Action::None);
}

#[test]
fn line_colors_rotate_through_palette() {
    let mut s = DrawingSession::new(Mode::Matching);
    for i in 0..8 {
        let x = f64::from(i);
        draw_line(&mut s, x, 0.0, x, 10.0);
    }
    let colors: Vec<LineColor> = s.collections().lines.iter().map(|l| l.color).collect();
    for (n, color) in colors.iter().enumerate() {
        assert_eq!(*color, LineColor::nth(n), "line {n}");
    }
    assert_eq!(colors[6], LineColor::Red);
}

#[test]
fn line_color_counter_survives_undo() {
    let mut s = DrawingSession::new(Mode::Matching);
    draw_line(&mut s, 0.0, 0.0, 1.0, 1.0);
    draw_line(&mut s, 0.0, 0.0, 2.0, 2.0);
    s.undo();
    s.redo();
    s.undo();
    // Third completed line takes palette slot 2 even though only one line is on the canvas.
    draw_line(&mut s, 0.0, 0.0, 3.0, 3.0);
    assert_eq!(s.collections().lines.len(), 2);
    assert_eq!(s.collections().lines[1].color, LineColor::nth(2));
}

// =============================================================
// Selection / delete / clear
// =============================================================

#[test]
fn delete_without_selection_is_noop() {
    let mut s = encircle();
    s.add_circle(pt(1.0, 1.0), false);
    assert_eq!(s.delete_selected(), Action::None);
    assert_eq!(s.collections().circles.len(), 1);
}

#[test]
fn delete_selected_removes_and_clears_selection() {
    let mut s = encircle();
    s.add_circle(pt(10.0, 10.0), false);
    s.add_circle(pt(200.0, 200.0), false);
    s.set_selected(Some(0));
    let payload = payload_of(s.delete_selected());
    assert_eq!(payload.len(), 1);
    assert_eq!(s.collections().circles[0].center(), pt(200.0, 200.0));
    assert_eq!(s.selected(), None);
}

#[test]
fn set_selected_rejects_out_of_range() {
    let mut s = encircle();
    s.add_circle(pt(10.0, 10.0), false);
    s.set_selected(Some(3));
    assert_eq!(s.selected(), None);
}

#[test]
fn select_at_requires_select_tool_in_encircle() {
    let mut s = encircle();
    s.add_circle(pt(50.0, 50.0), false);
    assert_eq!(s.select_at(pt(50.0, 50.0)), None);
    s.set_tool(Tool::Select);
    assert_eq!(s.select_at(pt(50.0, 50.0)), Some(0));
    assert_eq!(s.select_at(pt(400.0, 400.0)), None);
}

#[test]
fn select_at_finds_lines_in_matching() {
    let mut s = DrawingSession::new(Mode::Matching);
    draw_line(&mut s, 0.0, 0.0, 100.0, 0.0);
    assert_eq!(s.select_at(pt(50.0, 3.0)), Some(0));
}

#[test]
fn clear_all_empties_every_collection() {
    let mut s = DrawingSession::restore(
        Mode::Pattern,
        Collections {
            circles: vec![Enclosure::Circle(Circle { x: 1.0, y: 1.0, radius: 30.0 })],
            lines: vec![Line { points: [0.0; 4], color: LineColor::Red }],
            shapes: vec![PatternShape { x: 1.0, y: 1.0, kind: ShapeKind::Circle, size: 25.0 }],
        },
    )
    .unwrap();
    s.set_selected(Some(0));
    s.clear_all();
    assert_eq!(s.collections(), &Collections::default());
    assert_eq!(s.selected(), None);
    s.undo();
    assert_eq!(s.collections().circles.len(), 1);
    assert_eq!(s.selected(), Some(0));
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_on_fresh_session_is_noop() {
    let mut s = encircle();
    assert_eq!(s.undo(), Action::None);
    assert_eq!(s.redo(), Action::None);
}

#[test]
fn undo_then_redo_restores_exact_state() {
    let mut s = encircle();
    // Deterministic mixed sequence of 50 operations.
    for i in 0..50_u32 {
        let f = f64::from(i);
        match i % 5 {
            0 | 1 | 2 => {
                s.add_circle(pt(f * 7.0, f * 3.0), i % 2 == 0);
            }
            3 => {
                s.set_selected(Some(0));
                s.delete_selected();
            }
            _ => {
                if i % 20 == 4 {
                    s.clear_all();
                } else {
                    s.add_circle(pt(f, f), false);
                }
            }
        }
        let before = s.collections().clone();
        let selected = s.selected();
        if s.undo() != Action::None {
            s.redo();
        }
        assert_eq!(s.collections(), &before, "step {i}");
        assert_eq!(s.selected(), selected, "step {i}");
    }
}

#[test]
fn history_is_bounded() {
    let mut s = DrawingSession::with_capacity(Mode::Encircle, 3);
    for i in 0..6 {
        s.add_circle(pt(f64::from(i), 0.0), false);
    }
    let mut undone = 0;
    while s.undo() != Action::None {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(s.collections().circles.len(), 3);
}

// =============================================================
// Resize / move / drag
// =============================================================

fn selected_circle_session() -> DrawingSession {
    let mut s = encircle();
    s.add_circle(pt(100.0, 100.0), false);
    s.set_tool(Tool::Select);
    s.set_selected(Some(0));
    s
}

#[test]
fn resize_clamps_to_minimum() {
    let mut s = selected_circle_session();
    s.resize_selected(4.0);
    assert_eq!(s.collections().circles[0].radius(), 10.0);
    s.resize_selected(55.0);
    assert_eq!(s.collections().circles[0].radius(), 55.0);
}

#[test]
fn resize_requires_select_tool() {
    let mut s = selected_circle_session();
    s.set_tool(Tool::Draw);
    assert_eq!(s.resize_selected(55.0), Action::None);
    assert_eq!(s.collections().circles[0].radius(), 30.0);
}

#[test]
fn resize_oval_keeps_aspect() {
    let mut s = encircle();
    s.add_circle(pt(0.0, 0.0), true);
    s.set_tool(Tool::Select);
    s.set_selected(Some(0));
    s.resize_selected(80.0);
    assert_eq!(
        s.collections().circles[0],
        Enclosure::Oval(Oval { x: 0.0, y: 0.0, radius_x: 80.0, radius_y: 50.0 })
    );
}

#[test]
fn move_without_drag_does_not_record_history() {
    let mut s = selected_circle_session();
    s.move_selected(150.0, 160.0);
    assert_eq!(s.collections().circles[0].center(), pt(150.0, 160.0));
    // The only undo step is the original add.
    s.undo();
    assert!(s.collections().circles.is_empty());
}

#[test]
fn drag_gesture_is_one_undo_step() {
    let mut s = selected_circle_session();
    s.begin_drag();
    for step in 1..=10 {
        s.move_selected(100.0 + f64::from(step), 100.0);
    }
    s.resize_selected(45.0);
    s.end_drag();
    assert_eq!(s.collections().circles[0].center(), pt(110.0, 100.0));

    s.undo();
    assert_eq!(s.collections().circles[0], Enclosure::Circle(Circle { x: 100.0, y: 100.0, radius: 30.0 }));
    s.redo();
    assert_eq!(s.collections().circles[0], Enclosure::Circle(Circle { x: 110.0, y: 100.0, radius: 45.0 }));
}

#[test]
fn begin_drag_without_selection_records_nothing() {
    let mut s = encircle();
    s.begin_drag();
    assert!(!s.can_undo());
}

#[test]
fn move_line_translates_both_endpoints() {
    let mut s = DrawingSession::new(Mode::Matching);
    draw_line(&mut s, 0.0, 0.0, 10.0, 5.0);
    s.set_selected(Some(0));
    s.move_selected(20.0, 20.0);
    assert_eq!(s.collections().lines[0].points, [20.0, 20.0, 30.0, 25.0]);
}

#[test]
fn move_pattern_shape() {
    let mut s = DrawingSession::new(Mode::Pattern);
    s.add_pattern_shape(pt(0.0, 0.0), ShapeKind::Square);
    s.set_selected(Some(0));
    s.move_selected(7.0, 8.0);
    assert_eq!((s.collections().shapes[0].x, s.collections().shapes[0].y), (7.0, 8.0));
}

#[test]
fn move_rejects_non_finite() {
    let mut s = selected_circle_session();
    assert_eq!(s.move_selected(f64::NAN, 1.0), Action::None);
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_continues_palette_after_saved_lines() {
    let saved = Collections {
        lines: vec![
            Line { points: [0.0; 4], color: LineColor::Red },
            Line { points: [0.0; 4], color: LineColor::Blue },
        ],
        ..Collections::default()
    };
    let mut s = DrawingSession::restore(Mode::Matching, saved).unwrap();
    assert!(!s.can_undo());
    draw_line(&mut s, 1.0, 1.0, 2.0, 2.0);
    assert_eq!(s.collections().lines[2].color, LineColor::Green);
}

#[test]
fn restore_rejects_non_positive_radii() {
    let zero_oval = Collections {
        circles: vec![Enclosure::Oval(Oval { x: 5.0, y: 5.0, radius_x: 0.0, radius_y: 25.0 })],
        ..Collections::default()
    };
    assert_eq!(
        DrawingSession::restore(Mode::Encircle, zero_oval).unwrap_err(),
        MalformedAnswer::NonPositive { index: 0, field: "radiusX", value: 0.0 }
    );

    let negative_circle = Collections {
        circles: vec![
            Enclosure::Circle(Circle { x: 1.0, y: 1.0, radius: 30.0 }),
            Enclosure::Circle(Circle { x: 1.0, y: 1.0, radius: -5.0 }),
        ],
        ..Collections::default()
    };
    assert_eq!(
        DrawingSession::restore(Mode::Encircle, negative_circle).unwrap_err(),
        MalformedAnswer::NonPositive { index: 1, field: "radius", value: -5.0 }
    );
}

#[test]
fn restore_rejects_bad_lines_and_shapes() {
    let nan_line = Collections {
        lines: vec![Line { points: [0.0, 0.0, f64::INFINITY, 1.0], color: LineColor::Red }],
        ..Collections::default()
    };
    assert_eq!(
        DrawingSession::restore(Mode::Matching, nan_line).unwrap_err(),
        MalformedAnswer::NonFinite { index: 0, field: "x2" }
    );

    let flat_shape = Collections {
        shapes: vec![PatternShape { x: 1.0, y: 1.0, kind: ShapeKind::Square, size: 0.0 }],
        ..Collections::default()
    };
    assert!(matches!(
        DrawingSession::restore(Mode::Pattern, flat_shape),
        Err(MalformedAnswer::NonPositive { field: "size", .. })
    ));
}

#[test]
fn restored_oval_resizes_with_finite_aspect() {
    let saved = Collections {
        circles: vec![Enclosure::Oval(Oval { x: 5.0, y: 5.0, radius_x: 40.0, radius_y: 20.0 })],
        ..Collections::default()
    };
    let mut s = DrawingSession::restore(Mode::Encircle, saved).unwrap();
    s.set_tool(Tool::Select);
    s.set_selected(Some(0));
    s.resize_selected(80.0);
    let Enclosure::Oval(o) = s.collections().circles[0] else { panic!("expected oval") };
    assert_eq!((o.radius_x, o.radius_y), (80.0, 40.0));
}
