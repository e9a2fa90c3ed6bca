//! Geometric primitives: the shapes a student can draw on a question canvas.
//!
//! Every answer the canvas produces is built from these types. The per-mode
//! collections inside a drawing session hold `Enclosure`, `Line`, and
//! `PatternShape` directly; `Primitive` is the union over all of them that
//! dimension checks run against.
//!
//! Deserialization is strict about numbers: a primitive that omits a
//! required coordinate or dimension fails to parse rather than defaulting,
//! and [`Primitive::validate`] rejects zero, negative, and non-finite values
//! with [`MalformedAnswer`].

#[cfg(test)]
#[path = "primitive_test.rs"]
mod primitive_test;

use serde::{Deserialize, Serialize};

use crate::consts::LINE_PALETTE;

/// A point in canvas pixel space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// A submitted or stored answer could not be turned into primitives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedAnswer {
    /// The payload was not valid JSON, or an item was missing a required field.
    #[error("malformed answer JSON: {0}")]
    Json(String),

    /// The payload parsed but was not a JSON array.
    #[error("answer payload is not an array")]
    NotArray,

    /// A dimension (radius, size) was zero or negative.
    #[error("primitive {index}: {field} must be positive, got {value}")]
    NonPositive { index: usize, field: &'static str, value: f64 },

    /// A coordinate or dimension was NaN or infinite.
    #[error("primitive {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },
}

impl From<serde_json::Error> for MalformedAnswer {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

// =============================================================================
// SHAPES
// =============================================================================

/// A circle drawn around an object in `encircle` mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// An axis-aligned oval drawn in `encircle` mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oval {
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

/// Either kind of closed loop a student can draw to circle an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Enclosure {
    Circle(Circle),
    Oval(Oval),
}

impl Enclosure {
    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        match self {
            Self::Circle(c) => Point::new(c.x, c.y),
            Self::Oval(o) => Point::new(o.x, o.y),
        }
    }

    /// Horizontal radius; the only radius for a plain circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        match self {
            Self::Circle(c) => c.radius,
            Self::Oval(o) => o.radius_x,
        }
    }

    pub(crate) fn set_center(&mut self, p: Point) {
        match self {
            Self::Circle(c) => {
                c.x = p.x;
                c.y = p.y;
            }
            Self::Oval(o) => {
                o.x = p.x;
                o.y = p.y;
            }
        }
    }
}

/// Stroke color of a matching line. Assigned round-robin from [`LINE_PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineColor {
    #[serde(rename = "#e53935")]
    Red,
    #[serde(rename = "#1e88e5")]
    Blue,
    #[serde(rename = "#43a047")]
    Green,
    #[serde(rename = "#fb8c00")]
    Orange,
    #[serde(rename = "#8e24aa")]
    Purple,
    #[serde(rename = "#00897b")]
    Teal,
}

impl LineColor {
    /// Palette color for the `n`th completed line.
    #[must_use]
    pub fn nth(n: usize) -> Self {
        LINE_PALETTE[n % LINE_PALETTE.len()]
    }
}

/// A straight connector drawn in `matching` mode: `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub points: [f64; 4],
    pub color: LineColor,
}

impl Line {
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.points[0], self.points[1])
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.points[2], self.points[3])
    }
}

/// Shape vocabulary for `pattern` questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
}

impl ShapeKind {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "circle" => Some(Self::Circle),
            "triangle" => Some(Self::Triangle),
            "square" => Some(Self::Square),
            _ => None,
        }
    }
}

/// A shape stamped onto the canvas to complete a sequence in `pattern` mode.
///
/// The shape kind travels as `type` on the wire so the submitted list can be
/// compared item-by-item against the stored sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternShape {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub size: f64,
}

// =============================================================================
// UNION
// =============================================================================

/// Any drawable primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Circle(Circle),
    Oval(Oval),
    Line(Line),
    Pattern(PatternShape),
}

impl From<Enclosure> for Primitive {
    fn from(e: Enclosure) -> Self {
        match e {
            Enclosure::Circle(c) => Self::Circle(c),
            Enclosure::Oval(o) => Self::Oval(o),
        }
    }
}

impl Primitive {
    /// Check that every number is finite and every dimension strictly positive.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, tagged with `index` for reporting.
    pub fn validate(&self, index: usize) -> Result<(), MalformedAnswer> {
        let (coords, dims): (Vec<(&'static str, f64)>, Vec<(&'static str, f64)>) = match self {
            Self::Circle(c) => (vec![("x", c.x), ("y", c.y)], vec![("radius", c.radius)]),
            Self::Oval(o) => (vec![("x", o.x), ("y", o.y)], vec![("radiusX", o.radius_x), ("radiusY", o.radius_y)]),
            Self::Line(l) => (
                vec![("x1", l.points[0]), ("y1", l.points[1]), ("x2", l.points[2]), ("y2", l.points[3])],
                Vec::new(),
            ),
            Self::Pattern(s) => (vec![("x", s.x), ("y", s.y)], vec![("size", s.size)]),
        };

        for (field, value) in coords.iter().chain(dims.iter()) {
            if !value.is_finite() {
                return Err(MalformedAnswer::NonFinite { index, field });
            }
        }
        for (field, value) in dims {
            if value <= 0.0 {
                return Err(MalformedAnswer::NonPositive { index, field, value });
            }
        }
        Ok(())
    }
}
