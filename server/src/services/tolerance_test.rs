use super::*;

fn circle(x: f64, y: f64, radius: Option<f64>) -> CircleAnswer {
    CircleAnswer { x, y, radius, kind: None, radius_x: None, radius_y: None }
}

fn line(points: [f64; 4]) -> LineAnswer {
    LineAnswer { points }
}

fn eval(kind: &str, user: &str, correct: &str) -> bool {
    evaluate_interactive_answer(kind, user, correct, Pairing::Positional)
}

// =========================================================================
// Drawing
// =========================================================================

#[test]
fn drawing_within_tolerance_is_correct() {
    assert!(eval("DRAWING", r#"[{"x":10,"y":10,"radius":30}]"#, r#"[{"x":12,"y":11,"radius":35}]"#));
}

#[test]
fn drawing_tolerance_grid() {
    let c = circle(100.0, 100.0, Some(30.0));
    for dx in [-19.9, -10.0, 0.0, 10.0, 19.9] {
        for dy in [-19.9, 0.0, 19.9] {
            for dr in [-14.9, 0.0, 14.9] {
                let u = circle(100.0 + dx, 100.0 + dy, Some(30.0 + dr));
                assert!(evaluate_drawing_answer(&[u], &[c], Pairing::Positional), "dx={dx} dy={dy} dr={dr}");
            }
        }
    }
}

#[test]
fn drawing_boundaries_are_exclusive() {
    let c = circle(100.0, 100.0, Some(30.0));
    assert!(!evaluate_drawing_answer(&[circle(120.0, 100.0, Some(30.0))], &[c], Pairing::Positional));
    assert!(!evaluate_drawing_answer(&[circle(100.0, 80.0, Some(30.0))], &[c], Pairing::Positional));
    assert!(!evaluate_drawing_answer(&[circle(100.0, 100.0, Some(45.0))], &[c], Pairing::Positional));
}

#[test]
fn drawing_missing_radius_skips_radius_check() {
    let u = circle(100.0, 100.0, None);
    let c = circle(105.0, 95.0, Some(300.0));
    assert!(evaluate_drawing_answer(&[u], &[c], Pairing::Positional));
    assert!(evaluate_drawing_answer(&[c], &[u], Pairing::Positional));
}

#[test]
fn drawing_requires_every_pair() {
    let user = [circle(0.0, 0.0, None), circle(500.0, 500.0, None)];
    let correct = [circle(0.0, 0.0, None), circle(100.0, 100.0, None)];
    assert!(!evaluate_drawing_answer(&user, &correct, Pairing::Positional));
}

#[test]
fn drawing_missing_coordinate_is_incorrect_not_zeroed() {
    assert!(!eval("DRAWING", r#"[{"y":0,"radius":30}]"#, r#"[{"x":0,"y":0,"radius":30}]"#));
}

#[test]
fn length_mismatch_is_incorrect() {
    assert!(!eval("DRAWING", r#"[{"x":1,"y":1}]"#, r#"[{"x":1,"y":1},{"x":2,"y":2}]"#));
}

#[test]
fn empty_answers_match_each_other() {
    assert!(eval("DRAWING", "[]", "[]"));
}

// =========================================================================
// Matching
// =========================================================================

#[test]
fn matching_within_tolerance() {
    let u = line([10.0, 10.0, 200.0, 210.0]);
    let c = line([25.0, 0.0, 219.0, 191.0]);
    assert!(evaluate_matching_answer(&[u], &[c], Pairing::Positional));
}

#[test]
fn matching_one_coordinate_off_fails() {
    let u = line([10.0, 10.0, 200.0, 200.0]);
    let c = line([10.0, 10.0, 200.0, 220.0]);
    assert!(!evaluate_matching_answer(&[u], &[c], Pairing::Positional));
}

#[test]
fn matching_end_to_end_ignores_color() {
    assert!(eval(
        "MATCHING",
        r##"[{"points":[0,0,100,100],"color":"#e53935"}]"##,
        r#"[{"points":[5,5,95,105]}]"#
    ));
}

#[test]
fn matching_short_points_is_incorrect() {
    assert!(!eval("MATCHING", r#"[{"points":[0,0,100]}]"#, r#"[{"points":[0,0,100,100]}]"#));
}

// =========================================================================
// Pattern
// =========================================================================

#[test]
fn pattern_type_mismatch_is_incorrect() {
    assert!(!eval("PATTERN", r#"[{"type":"circle"}]"#, r#"[{"type":"triangle"}]"#));
}

#[test]
fn pattern_ignores_position_and_size() {
    assert!(eval(
        "PATTERN",
        r#"[{"type":"square","x":0,"y":0,"size":25},{"type":"circle","x":900,"y":5,"size":80}]"#,
        r#"[{"type":"square"},{"type":"circle"}]"#
    ));
}

// =========================================================================
// Malformed input
// =========================================================================

#[test]
fn malformed_inputs_grade_false() {
    let good = r#"[{"x":1,"y":1}]"#;
    for bad in ["", "not json", "[1,2", r#"{"x":1,"y":1}"#, r#""not json""#, r#""{\"x\":1}""#] {
        assert!(!eval("DRAWING", bad, good), "user={bad:?}");
        assert!(!eval("DRAWING", good, bad), "correct={bad:?}");
    }
}

#[test]
fn unsupported_type_grades_false() {
    assert!(!eval("ESSAY", "[]", "[]"));
    assert!(matches!(
        try_evaluate("drawing", "[]", "[]", Pairing::Positional),
        Err(GradeError::UnsupportedQuestionType(_))
    ));
}

#[test]
fn malformed_error_names_the_side() {
    let err = try_evaluate("PATTERN", "[]", "oops", Pairing::Positional).unwrap_err();
    assert!(matches!(err, GradeError::Malformed { side: "correct", .. }));
}

// =========================================================================
// Double encoding
// =========================================================================

#[test]
fn double_encoded_matches_single_encoded() {
    let user = r#"[{"x":10,"y":10,"radius":30}]"#;
    let correct = r#"[{"x":12,"y":11,"radius":35}]"#;
    let user_twice = serde_json::to_string(user).unwrap();
    let correct_twice = serde_json::to_string(correct).unwrap();

    assert!(eval("DRAWING", &user_twice, correct));
    assert!(eval("DRAWING", user, &correct_twice));
    assert!(eval("DRAWING", &user_twice, &correct_twice));

    let single: Vec<CircleAnswer> = parse_answer_array(user).unwrap();
    let double: Vec<CircleAnswer> = parse_answer_array(&user_twice).unwrap();
    assert_eq!(single, double);
}

#[test]
fn triple_encoding_is_rejected() {
    let twice = serde_json::to_string(&serde_json::to_string("[]").unwrap()).unwrap();
    assert!(matches!(parse_answer_array::<PatternAnswer>(&twice), Err(MalformedAnswer::NotArray)));
}

// =========================================================================
// Any-order pairing
// =========================================================================

#[test]
fn positional_pairing_rejects_reordered_answer() {
    let user = [circle(300.0, 300.0, Some(30.0)), circle(50.0, 50.0, Some(30.0))];
    let correct = [circle(50.0, 50.0, Some(30.0)), circle(300.0, 300.0, Some(30.0))];
    assert!(!evaluate_drawing_answer(&user, &correct, Pairing::Positional));
    assert!(evaluate_drawing_answer(&user, &correct, Pairing::AnyOrder));
}

#[test]
fn any_order_needs_distinct_partners() {
    // Both submitted circles sit on the first reference circle; the second has no partner.
    let user = [circle(50.0, 50.0, None), circle(52.0, 52.0, None)];
    let correct = [circle(50.0, 50.0, None), circle(300.0, 300.0, None)];
    assert!(!evaluate_drawing_answer(&user, &correct, Pairing::AnyOrder));
}

#[test]
fn any_order_reassigns_greedy_choice() {
    // user[0] matches both references; a greedy pick of correct[0] would strand user[1].
    let user = [circle(60.0, 50.0, None), circle(45.0, 50.0, None)];
    let correct = [circle(50.0, 50.0, None), circle(75.0, 50.0, None)];
    assert!(evaluate_drawing_answer(&user, &correct, Pairing::AnyOrder));
}

#[test]
fn any_order_patterns() {
    let parse = |s: &str| parse_answer_array::<PatternAnswer>(s).unwrap();
    let user = parse(r#"[{"type":"triangle"},{"type":"circle"}]"#);
    let correct = parse(r#"[{"type":"circle"},{"type":"triangle"}]"#);
    assert!(evaluate_pattern_answer(&user, &correct, Pairing::AnyOrder));
    assert!(!evaluate_pattern_answer(&user, &correct, Pairing::Positional));
}
