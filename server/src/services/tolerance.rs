//! Tolerance grading — deterministic comparison of drawn answers.
//!
//! DESIGN
//! ======
//! A submitted answer and its stored reference are JSON arrays of the same
//! item shape. Items are paired and each pair must agree within fixed
//! pixel tolerances (all bounds exclusive). Pairing is positional by
//! default: item `i` of the submission is compared with item `i` of the
//! reference, which assumes both were drawn in the same order.
//! [`Pairing::AnyOrder`] drops that assumption and succeeds when every
//! submitted item can be assigned a distinct reference item it matches.
//!
//! Grading never fails loudly. Unparseable input, a non-array payload, or an
//! unknown question type all grade as incorrect and log a warning.

use canvas::answer::{CircleAnswer, LineAnswer, PatternAnswer};
use canvas::primitive::MalformedAnswer;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Max |dx| and |dy| between paired circle centers, exclusive.
pub const POSITION_TOLERANCE: f64 = 20.0;
/// Max |dr| between paired circle radii, exclusive.
pub const RADIUS_TOLERANCE: f64 = 15.0;
/// Max per-coordinate difference between paired line endpoints, exclusive.
pub const LINE_TOLERANCE: f64 = 20.0;

// =============================================================================
// TYPES
// =============================================================================

/// Interactive question types graded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Drawing,
    Matching,
    Pattern,
}

impl QuestionType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAWING" => Some(Self::Drawing),
            "MATCHING" => Some(Self::Matching),
            "PATTERN" => Some(Self::Pattern),
            _ => None,
        }
    }
}

/// How submitted items are paired with reference items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pairing {
    /// Item `i` pairs with item `i`.
    #[default]
    Positional,
    /// Any one-to-one assignment where every pair matches.
    AnyOrder,
}

#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("unsupported question type: {0}")]
    UnsupportedQuestionType(String),
    #[error("{side} answer: {source}")]
    Malformed { side: &'static str, source: MalformedAnswer },
}

impl crate::error::ErrorCode for GradeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedQuestionType(_) => "E_UNSUPPORTED_QUESTION_TYPE",
            Self::Malformed { .. } => "E_MALFORMED_ANSWER",
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Grade a raw submission against a raw reference. Never fails; errors grade as `false`.
#[must_use]
pub fn evaluate_interactive_answer(question_type: &str, user_raw: &str, correct_raw: &str, pairing: Pairing) -> bool {
    match try_evaluate(question_type, user_raw, correct_raw, pairing) {
        Ok(correct) => correct,
        Err(e) => {
            warn!(question_type, error = %e, "tolerance: answer graded incorrect");
            false
        }
    }
}

/// Grade a raw submission, surfacing why grading was impossible.
///
/// # Errors
///
/// Returns [`GradeError`] for an unknown question type or a malformed payload.
pub fn try_evaluate(question_type: &str, user_raw: &str, correct_raw: &str, pairing: Pairing) -> Result<bool, GradeError> {
    let kind = QuestionType::parse(question_type)
        .ok_or_else(|| GradeError::UnsupportedQuestionType(question_type.to_string()))?;
    Ok(match kind {
        QuestionType::Drawing => {
            let (user, correct) = parse_pair::<CircleAnswer>(user_raw, correct_raw)?;
            evaluate_drawing_answer(&user, &correct, pairing)
        }
        QuestionType::Matching => {
            let (user, correct) = parse_pair::<LineAnswer>(user_raw, correct_raw)?;
            evaluate_matching_answer(&user, &correct, pairing)
        }
        QuestionType::Pattern => {
            let (user, correct) = parse_pair::<PatternAnswer>(user_raw, correct_raw)?;
            evaluate_pattern_answer(&user, &correct, pairing)
        }
    })
}

fn parse_pair<T: DeserializeOwned>(user_raw: &str, correct_raw: &str) -> Result<(Vec<T>, Vec<T>), GradeError> {
    let user = parse_answer_array(user_raw).map_err(|source| GradeError::Malformed { side: "user", source })?;
    let correct =
        parse_answer_array(correct_raw).map_err(|source| GradeError::Malformed { side: "correct", source })?;
    Ok((user, correct))
}

/// Parse a JSON array of answer items, unwrapping at most one extra level of
/// string encoding (a JSON string whose contents are the array).
///
/// # Errors
///
/// Returns [`MalformedAnswer`] for invalid JSON at either level, a non-array
/// result, or items missing required fields.
pub fn parse_answer_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, MalformedAnswer> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;
    if let serde_json::Value::String(inner) = &value {
        value = serde_json::from_str(inner)?;
    }
    if !value.is_array() {
        return Err(MalformedAnswer::NotArray);
    }
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// PER-TYPE GRADERS
// =============================================================================

/// Circle answers: centers within [`POSITION_TOLERANCE`], radii within
/// [`RADIUS_TOLERANCE`] when both sides carry one.
#[must_use]
pub fn evaluate_drawing_answer(user: &[CircleAnswer], correct: &[CircleAnswer], pairing: Pairing) -> bool {
    paired(user, correct, pairing, circles_match)
}

/// Line answers: every endpoint coordinate within [`LINE_TOLERANCE`].
#[must_use]
pub fn evaluate_matching_answer(user: &[LineAnswer], correct: &[LineAnswer], pairing: Pairing) -> bool {
    paired(user, correct, pairing, lines_match)
}

/// Pattern answers: shape kinds equal. Position and size are ignored.
#[must_use]
pub fn evaluate_pattern_answer(user: &[PatternAnswer], correct: &[PatternAnswer], pairing: Pairing) -> bool {
    paired(user, correct, pairing, |u, c| u.kind == c.kind)
}

#[must_use]
pub fn circles_match(u: &CircleAnswer, c: &CircleAnswer) -> bool {
    let position_ok = (u.x - c.x).abs() < POSITION_TOLERANCE && (u.y - c.y).abs() < POSITION_TOLERANCE;
    let radius_ok = match (u.radius, c.radius) {
        (Some(ur), Some(cr)) => (ur - cr).abs() < RADIUS_TOLERANCE,
        _ => true,
    };
    position_ok && radius_ok
}

#[must_use]
pub fn lines_match(u: &LineAnswer, c: &LineAnswer) -> bool {
    u.points
        .iter()
        .zip(c.points.iter())
        .all(|(a, b)| (a - b).abs() < LINE_TOLERANCE)
}

fn paired<T>(user: &[T], correct: &[T], pairing: Pairing, matches: impl Fn(&T, &T) -> bool) -> bool {
    if user.len() != correct.len() {
        return false;
    }
    match pairing {
        Pairing::Positional => user.iter().zip(correct).all(|(u, c)| matches(u, c)),
        Pairing::AnyOrder => has_perfect_assignment(user, correct, &matches),
    }
}

/// Bipartite matching by augmenting paths. Answers are a handful of items,
/// so the O(n³) bound is irrelevant.
fn has_perfect_assignment<T>(user: &[T], correct: &[T], matches: &impl Fn(&T, &T) -> bool) -> bool {
    let n = user.len();
    let adjacency: Vec<Vec<usize>> = user
        .iter()
        .map(|u| (0..n).filter(|&j| matches(u, &correct[j])).collect())
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; n];
    for u in 0..n {
        let mut seen = vec![false; n];
        if !augment(u, &adjacency, &mut owner, &mut seen) {
            return false;
        }
    }
    true
}

fn augment(u: usize, adjacency: &[Vec<usize>], owner: &mut [Option<usize>], seen: &mut [bool]) -> bool {
    for &c in &adjacency[u] {
        if seen[c] {
            continue;
        }
        seen[c] = true;
        let free = match owner[c] {
            None => true,
            Some(prev) => augment(prev, adjacency, owner, seen),
        };
        if free {
            owner[c] = Some(u);
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "tolerance_test.rs"]
mod tests;
