//! Shared numeric constants for the canvas crate.

use crate::primitive::LineColor;

// ── Defaults for newly placed primitives ────────────────────────

/// Radius of a freshly placed circle.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 30.0;

/// Horizontal radius of a freshly placed oval.
pub const DEFAULT_OVAL_RADIUS_X: f64 = 40.0;

/// Vertical radius of a freshly placed oval.
pub const DEFAULT_OVAL_RADIUS_Y: f64 = 25.0;

/// Size of a freshly stamped pattern shape.
pub const DEFAULT_SHAPE_SIZE: f64 = 25.0;

/// Smallest radius an interactive resize may produce.
pub const MIN_RADIUS: f64 = 10.0;

// ── Lines ───────────────────────────────────────────────────────

/// Round-robin stroke colors for matching lines.
pub const LINE_PALETTE: [LineColor; 6] = [
    LineColor::Red,
    LineColor::Blue,
    LineColor::Green,
    LineColor::Orange,
    LineColor::Purple,
    LineColor::Teal,
];

// ── History ─────────────────────────────────────────────────────

/// Maximum undo depth per drawing session. Oldest entries are evicted first.
pub const HISTORY_CAPACITY: usize = 50;

// ── Hit-testing ─────────────────────────────────────────────────

/// Pointer slop in pixels for selecting thin strokes and shape edges.
pub const HIT_SLOP_PX: f64 = 8.0;
