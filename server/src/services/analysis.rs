//! Vision-assisted grading — score a captured drawing against what the
//! oracle detected in it.
//!
//! DESIGN
//! ======
//! The oracle reports named objects with pixel-space boxes. The submitted
//! drawing (circles or lines in the same pixel space) is tested against
//! those boxes with simple point-in-region checks:
//!
//! - circling: an object counts as circled when any of its box's sample
//!   points (corners and center) falls within `radius + 50px` of a circle
//! - matching: a line is a connection when its ends land within 40px of two
//!   different objects' boxes
//! - general: a flat heuristic rewarding any drawing and any detection
//!
//! The raw score is then discounted by a detection-quality factor, so weak
//! detections never produce a confident grade. Oracle failure of any kind
//! (missing config, transport error, timeout) degrades to the simulated
//! grader in [`super::fallback`] instead of failing the request.

use std::time::Duration;

use canvas::answer::{CircleAnswer, LineAnswer};
use canvas::consts::DEFAULT_CIRCLE_RADIUS;
use canvas::primitive::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::fallback;
use crate::error::ErrorCode;
use crate::vision::VisionOracle;
use crate::vision::types::{DetectedObject, ImageInput, VisionError, VisionResult};

/// Extra reach added to a circle's radius when looking for circled objects.
pub const CIRCLE_REACH_PX: f64 = 50.0;
/// Margin added around a detected box when snapping line endpoints.
pub const LINE_MARGIN_PX: f64 = 40.0;

const GENERAL_BASE: f64 = 50.0;
const GENERAL_BONUS: f64 = 25.0;

// =============================================================================
// TYPES
// =============================================================================

/// Which grading rule applies to a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Circling,
    Matching,
    General,
}

impl TaskKind {
    /// Prefer the question's declared kind; sniff the prompt text only when
    /// none was supplied.
    #[must_use]
    pub fn resolve(declared: Option<Self>, question_text: &str) -> Self {
        declared.unwrap_or_else(|| Self::from_question_text(question_text))
    }

    /// Keyword routing on the prompt text, case-insensitive.
    #[must_use]
    pub fn from_question_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("circle") || text.contains("encercl") {
            Self::Circling
        } else if text.contains("match") || text.contains("connect") {
            Self::Matching
        } else {
            Self::General
        }
    }
}

/// One user annotation as submitted with a capture.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Line(LineAnswer),
    Circle(CircleAnswer),
}

impl Annotation {
    /// Parse a submitted drawing, skipping items that are neither a circle
    /// nor a line.
    #[must_use]
    pub fn parse_drawing(items: &[serde_json::Value]) -> Vec<Self> {
        items
            .iter()
            .filter_map(|item| match Self::deserialize(item) {
                Ok(annotation) => Some(annotation),
                Err(e) => {
                    debug!(error = %e, "analysis: skipping unrecognized annotation");
                    None
                }
            })
            .collect()
    }
}

/// A line whose ends landed on two different detected objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

/// Diagnostic payload returned alongside a vision-assisted score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetails {
    pub task: TaskKind,
    pub detected_objects: Vec<DetectedObject>,
    pub detected_text: Vec<String>,
    pub circled_objects: Vec<String>,
    pub connections: Vec<Connection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_error: Option<String>,
}

impl EvaluationDetails {
    #[must_use]
    pub fn empty(task: TaskKind) -> Self {
        Self {
            task,
            detected_objects: Vec::new(),
            detected_text: Vec::new(),
            circled_objects: Vec::new(),
            connections: Vec::new(),
            detection_quality: None,
            raw_score: None,
            fallback_used: false,
            vision_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
    pub details: EvaluationDetails,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Grade a capture with the oracle, or with the fallback when the oracle is
/// absent, fails, or misses `deadline`.
pub async fn analyze_capture(
    oracle: Option<&dyn VisionOracle>,
    image: &ImageInput,
    drawing: &[Annotation],
    task: TaskKind,
    correct_answer: Option<&str>,
    deadline: Duration,
) -> Evaluation {
    let outcome = match oracle {
        None => Err(VisionError::NotConfigured),
        Some(oracle) => match tokio::time::timeout(deadline, oracle.analyze(image)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(VisionError::Timeout { secs: deadline.as_secs() }),
        },
    };

    match outcome {
        Ok(result) => {
            let evaluation = compare_with_expected_answer(&result, drawing, task, correct_answer);
            info!(
                task = ?task,
                objects = result.objects.len(),
                score = evaluation.score,
                fallback_used = false,
                "analysis: graded with vision oracle"
            );
            evaluation
        }
        Err(e) => {
            warn!(
                task = ?task,
                error = %e,
                code = e.error_code(),
                retryable = e.retryable(),
                fallback_used = true,
                "analysis: vision oracle unavailable, using simulated grade"
            );
            fallback::simulate(&mut rand::rng(), task, Some(e.to_string()))
        }
    }
}

// =============================================================================
// SCORING
// =============================================================================

/// Score `drawing` against the oracle's view of the captured image.
#[must_use]
pub fn compare_with_expected_answer(
    result: &VisionResult,
    drawing: &[Annotation],
    task: TaskKind,
    correct_answer: Option<&str>,
) -> Evaluation {
    let mut details = EvaluationDetails::empty(task);
    details.detected_objects.clone_from(&result.objects);
    details.detected_text = result.text_detections.iter().map(|t| t.text.clone()).collect();

    let (raw, feedback) = match task {
        TaskKind::Circling => {
            let drawn: Vec<&CircleAnswer> = circles(drawing).collect();
            let circled = circled_objects(&result.objects, &drawn);
            let (raw, feedback) = circling_score(&circled, drawn.len(), correct_answer);
            details.circled_objects = circled;
            (raw, feedback)
        }
        TaskKind::Matching => {
            let drawn: Vec<&LineAnswer> = lines(drawing).collect();
            let valid = connections(&result.objects, &drawn);
            let raw = ratio(valid.len(), drawn.len());
            let feedback = if drawn.is_empty() {
                "Draw lines to connect the matching pictures.".to_string()
            } else {
                format!("{} of your {} lines connect two pictures.", valid.len(), drawn.len())
            };
            details.connections = valid;
            (raw, feedback)
        }
        TaskKind::General => general_score(!drawing.is_empty(), !result.objects.is_empty()),
    };

    let quality = detection_quality(result);
    details.detection_quality = Some(quality);
    details.raw_score = Some(raw);

    Evaluation { score: final_score(raw, quality), feedback, details }
}

/// Confidence discount in `[0.7, 1.0]`.
#[must_use]
pub fn detection_quality(result: &VisionResult) -> f64 {
    let mut quality = 0.7;
    if !result.objects.is_empty() {
        quality += 0.2;
    }
    if result.mean_confidence() > 0.5 {
        quality += 0.1;
    }
    quality
}

/// Scale, clamp to `[0, 100]`, and round.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn final_score(raw: f64, quality: f64) -> u8 {
    let scaled = raw * quality;
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 100.0).round() as u8
}

fn circles(drawing: &[Annotation]) -> impl Iterator<Item = &CircleAnswer> {
    drawing.iter().filter_map(|a| match a {
        Annotation::Circle(c) => Some(c),
        Annotation::Line(_) => None,
    })
}

fn lines(drawing: &[Annotation]) -> impl Iterator<Item = &LineAnswer> {
    drawing.iter().filter_map(|a| match a {
        Annotation::Line(l) => Some(l),
        Annotation::Circle(_) => None,
    })
}

/// Reach of a drawn circle; ovals fall back to their horizontal radius.
///
/// Non-finite or non-positive radii are ignored in favor of the default size.
fn circle_radius(circle: &CircleAnswer) -> f64 {
    let usable = |r: &f64| r.is_finite() && *r > 0.0;
    if let Some(r) = circle.radius.filter(usable).or_else(|| circle.radius_x.filter(usable)) {
        return r;
    }
    if circle.radius.is_some() || circle.radius_x.is_some() {
        debug!(radius = ?circle.radius, radius_x = ?circle.radius_x, "ignoring unusable drawn radius");
    }
    DEFAULT_CIRCLE_RADIUS
}

/// Whether `object` counts as circled by `circle`.
#[must_use]
pub fn circle_encloses(circle: &CircleAnswer, object: &DetectedObject) -> bool {
    let center = Point::new(circle.x, circle.y);
    let reach = circle_radius(circle) + CIRCLE_REACH_PX;
    object
        .bounding_box
        .sample_points()
        .iter()
        .any(|p| center.distance(*p) <= reach)
}

/// Names of circled objects, one entry per circle/object hit. An object
/// caught by two circles is listed twice.
fn circled_objects(objects: &[DetectedObject], circles: &[&CircleAnswer]) -> Vec<String> {
    circles
        .iter()
        .flat_map(|circle| {
            objects
                .iter()
                .filter(move |object| circle_encloses(circle, object))
                .map(|object| object.name.clone())
        })
        .collect()
}

fn circling_score(circled: &[String], drawn: usize, correct_answer: Option<&str>) -> (f64, String) {
    if drawn == 0 {
        return (0.0, "Draw a circle around your answer.".to_string());
    }
    if circled.is_empty() {
        return (0.0, "Your circles don't seem to surround any pictures. Try again!".to_string());
    }
    match correct_answer.map(str::trim).filter(|a| !a.is_empty()) {
        Some(answer) => {
            let answer = answer.to_lowercase();
            let hits = circled
                .iter()
                .filter(|name| answer.contains(&name.to_lowercase()))
                .count();
            let feedback = if hits == circled.len() {
                "Great job! You circled the right pictures.".to_string()
            } else {
                format!("You circled {hits} of {} pictures correctly.", circled.len())
            };
            (ratio(hits, circled.len()), feedback)
        }
        None => (
            ratio(circled.len(), drawn),
            format!("You circled: {}.", circled.join(", ")),
        ),
    }
}

/// Lines whose start and end land on two different objects.
fn connections(objects: &[DetectedObject], lines: &[&LineAnswer]) -> Vec<Connection> {
    lines
        .iter()
        .filter_map(|line| {
            let [x1, y1, x2, y2] = line.points;
            let start = Point::new(x1, y1);
            let end = Point::new(x2, y2);
            objects.iter().enumerate().find_map(|(i, from)| {
                if !from.bounding_box.contains_with_margin(start, LINE_MARGIN_PX) {
                    return None;
                }
                objects
                    .iter()
                    .enumerate()
                    .find(|(j, to)| *j != i && to.bounding_box.contains_with_margin(end, LINE_MARGIN_PX))
                    .map(|(_, to)| Connection { from: from.name.clone(), to: to.name.clone() })
            })
        })
        .collect()
}

fn general_score(has_drawing: bool, has_detections: bool) -> (f64, String) {
    let mut raw = GENERAL_BASE;
    if has_drawing {
        raw += GENERAL_BONUS;
    }
    if has_detections {
        raw += GENERAL_BONUS;
    }
    let feedback = if has_drawing {
        "Thanks for your drawing! Your teacher can review it."
    } else {
        "Try marking your answer on the picture."
    };
    (raw, feedback.to_string())
}

/// `num / den` as a percentage; zero when `den` is zero.
#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64 * 100.0
}

#[cfg(test)]
#[path = "analysis_test.rs"]
mod tests;
