//! Answer payloads: what a drawing session submits, and what graders read back.
//!
//! [`normalize`] turns a session's active collection into the canonical
//! [`AnswerPayload`] that is serialized to JSON and stored with the answer
//! record. The `*Answer` item types are the lenient read side: they accept
//! both payloads produced here and older stored reference answers, where
//! only the fields that grading actually compares are required.

#[cfg(test)]
#[path = "answer_test.rs"]
mod answer_test;

use serde::{Deserialize, Serialize};

use crate::primitive::{Enclosure, Line, MalformedAnswer, PatternShape, ShapeKind};
use crate::session::{Collections, Mode};

/// Which closed loop a circle answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnclosureKind {
    Circle,
    Oval,
}

/// One encircle-mode answer item.
///
/// `radius` always carries the horizontal radius so single-radius consumers
/// keep working; ovals additionally carry both radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleAnswer {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EnclosureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f64>,
}

impl From<&Enclosure> for CircleAnswer {
    fn from(e: &Enclosure) -> Self {
        match e {
            Enclosure::Circle(c) => Self {
                x: c.x,
                y: c.y,
                radius: Some(c.radius),
                kind: Some(EnclosureKind::Circle),
                radius_x: None,
                radius_y: None,
            },
            Enclosure::Oval(o) => Self {
                x: o.x,
                y: o.y,
                radius: Some(o.radius_x),
                kind: Some(EnclosureKind::Oval),
                radius_x: Some(o.radius_x),
                radius_y: Some(o.radius_y),
            },
        }
    }
}

/// One matching-mode answer item. Stroke color is not graded and not required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineAnswer {
    pub points: [f64; 4],
}

/// One pattern-mode answer item. Only the shape kind is graded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternAnswer {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Canonical submitted answer. Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    Encircle(Vec<CircleAnswer>),
    Matching(Vec<Line>),
    Pattern(Vec<PatternShape>),
}

impl AnswerPayload {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Encircle(v) => v.len(),
            Self::Matching(v) => v.len(),
            Self::Pattern(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize as the JSON array stored on the answer record.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedAnswer::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, MalformedAnswer> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build the submitted payload for `mode` from the session collections.
///
/// Only the collection belonging to `mode` contributes.
#[must_use]
pub fn normalize(mode: Mode, collections: &Collections) -> AnswerPayload {
    match mode {
        Mode::Encircle => AnswerPayload::Encircle(collections.circles.iter().map(CircleAnswer::from).collect()),
        Mode::Matching => AnswerPayload::Matching(collections.lines.clone()),
        Mode::Pattern => AnswerPayload::Pattern(collections.shapes.clone()),
    }
}
