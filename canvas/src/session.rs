//! Drawing session: the per-question interaction state machine.
//!
//! A session is created when an interactive question is shown and owns the
//! three primitive collections, the current selection, the active tool, and
//! a bounded undo/redo history. Its `mode` is fixed at construction and
//! decides which collection the input operations touch.
//!
//! Every operation is total. Calls made in the wrong mode, with the wrong
//! tool, or without a selection are ignored and report [`Action::None`];
//! calls that change the answer report [`Action::AnswerChanged`] carrying
//! the freshly normalized payload for the host form state.
//!
//! Drag gestures (`begin_drag` .. `end_drag`) form a single undo step:
//! history is recorded once at drag start, and the `move_selected` /
//! `resize_selected` calls in between mutate in place.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::answer::{AnswerPayload, normalize};
use crate::consts::{
    DEFAULT_CIRCLE_RADIUS, DEFAULT_OVAL_RADIUS_X, DEFAULT_OVAL_RADIUS_Y, DEFAULT_SHAPE_SIZE, HISTORY_CAPACITY,
    MIN_RADIUS,
};
use crate::hit::{hits_enclosure, hits_line, hits_shape, topmost};
use crate::history::History;
use crate::primitive::{
    Circle, Enclosure, Line, LineColor, MalformedAnswer, Oval, PatternShape, Point, Primitive, ShapeKind,
};

/// Interactive answer type of the question being drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Circle the objects that answer the question.
    Encircle,
    /// Connect related objects with lines.
    Matching,
    /// Place shapes to complete a sequence.
    Pattern,
}

impl Mode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "encircle" => Some(Self::Encircle),
            "matching" => Some(Self::Matching),
            "pattern" => Some(Self::Pattern),
            _ => None,
        }
    }
}

/// Pointer tool. Only consulted in [`Mode::Encircle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Clicking places a new circle.
    #[default]
    Draw,
    /// Clicking selects; dragging moves or resizes.
    Select,
}

/// The drawn primitives, one list per mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub circles: Vec<Enclosure>,
    pub lines: Vec<Line>,
    pub shapes: Vec<PatternShape>,
}

impl Collections {
    fn active_len(&self, mode: Mode) -> usize {
        match mode {
            Mode::Encircle => self.circles.len(),
            Mode::Matching => self.lines.len(),
            Mode::Pattern => self.shapes.len(),
        }
    }

    /// Check every stored primitive. Error indexes are positions within their own list.
    fn validate(&self) -> Result<(), MalformedAnswer> {
        for (i, e) in self.circles.iter().enumerate() {
            Primitive::from(*e).validate(i)?;
        }
        for (i, l) in self.lines.iter().enumerate() {
            Primitive::Line(*l).validate(i)?;
        }
        for (i, s) in self.shapes.iter().enumerate() {
            Primitive::Pattern(*s).validate(i)?;
        }
        Ok(())
    }
}

/// What a session operation did, for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Nothing observable changed.
    None,
    /// The answer changed; carries the new normalized payload.
    AnswerChanged(AnswerPayload),
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    collections: Collections,
    selected: Option<usize>,
}

/// Interaction state for one question in one mode.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    mode: Mode,
    tool: Tool,
    collections: Collections,
    selected: Option<usize>,
    history: History<Snapshot>,
    pending_line: Option<Point>,
    /// Completed lines so far; drives palette rotation and is never rewound.
    lines_completed: usize,
    dragging: bool,
}

impl DrawingSession {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self::with_capacity(mode, HISTORY_CAPACITY)
    }

    /// Create a session with a custom undo depth.
    #[must_use]
    pub fn with_capacity(mode: Mode, history_capacity: usize) -> Self {
        Self {
            mode,
            tool: Tool::default(),
            collections: Collections::default(),
            selected: None,
            history: History::new(history_capacity),
            pending_line: None,
            lines_completed: 0,
            dragging: false,
        }
    }

    /// Rehydrate a session from previously saved collections. History starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedAnswer`] if any saved primitive has a non-finite
    /// number or a dimension that is not strictly positive.
    pub fn restore(mode: Mode, collections: Collections) -> Result<Self, MalformedAnswer> {
        collections.validate()?;
        let lines_completed = collections.lines.len();
        Ok(Self { collections, lines_completed, ..Self::new(mode) })
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    #[must_use]
    pub fn pending_line(&self) -> Option<Point> {
        self.pending_line
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Normalized payload for the current state.
    #[must_use]
    pub fn payload(&self) -> AnswerPayload {
        normalize(self.mode, &self.collections)
    }

    // --- Tool / selection ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Select by index into the active collection. Out-of-range indexes clear the selection.
    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.collections.active_len(self.mode));
    }

    /// Select the topmost primitive under `pt`, or clear the selection on empty space.
    ///
    /// In encircle mode this requires the select tool.
    pub fn select_at(&mut self, pt: Point) -> Option<usize> {
        if self.mode == Mode::Encircle && self.tool != Tool::Select {
            return self.selected;
        }
        self.selected = match self.mode {
            Mode::Encircle => topmost(&self.collections.circles, pt, hits_enclosure),
            Mode::Matching => topmost(&self.collections.lines, pt, hits_line),
            Mode::Pattern => topmost(&self.collections.shapes, pt, hits_shape),
        };
        self.selected
    }

    // --- Drawing ---

    /// Place a circle (or oval) centered at `pt`. Encircle mode, draw tool.
    pub fn add_circle(&mut self, pt: Point, oval: bool) -> Action {
        if self.mode != Mode::Encircle || self.tool != Tool::Draw {
            return Action::None;
        }
        let shape = if oval {
            Enclosure::Oval(Oval { x: pt.x, y: pt.y, radius_x: DEFAULT_OVAL_RADIUS_X, radius_y: DEFAULT_OVAL_RADIUS_Y })
        } else {
            Enclosure::Circle(Circle { x: pt.x, y: pt.y, radius: DEFAULT_CIRCLE_RADIUS })
        };
        self.record();
        self.collections.circles.push(shape);
        self.changed()
    }

    /// Stamp a pattern shape at `pt`. Pattern mode only.
    pub fn add_pattern_shape(&mut self, pt: Point, kind: ShapeKind) -> Action {
        if self.mode != Mode::Pattern {
            return Action::None;
        }
        self.record();
        self.collections.shapes.push(PatternShape { x: pt.x, y: pt.y, kind, size: DEFAULT_SHAPE_SIZE });
        self.changed()
    }

    /// Start a matching line at `pt`. Replaces any unfinished start point.
    pub fn begin_line(&mut self, pt: Point) {
        if self.mode == Mode::Matching {
            self.pending_line = Some(pt);
        }
    }

    /// Finish the pending line at `pt`. No-op without a pending start.
    pub fn end_line(&mut self, pt: Point) -> Action {
        if self.mode != Mode::Matching {
            return Action::None;
        }
        let Some(start) = self.pending_line.take() else {
            return Action::None;
        };
        let color = LineColor::nth(self.lines_completed);
        self.lines_completed += 1;
        self.record();
        self.collections.lines.push(Line { points: [start.x, start.y, pt.x, pt.y], color });
        self.changed()
    }

    /// Drop a pending line start without drawing anything.
    pub fn cancel_line(&mut self) {
        self.pending_line = None;
    }

    // --- Editing ---

    /// Remove the selected primitive from the active collection.
    pub fn delete_selected(&mut self) -> Action {
        let Some(index) = self.valid_selection() else {
            return Action::None;
        };
        self.record();
        match self.mode {
            Mode::Encircle => {
                self.collections.circles.remove(index);
            }
            Mode::Matching => {
                self.collections.lines.remove(index);
            }
            Mode::Pattern => {
                self.collections.shapes.remove(index);
            }
        }
        self.selected = None;
        self.changed()
    }

    /// Empty every collection, whatever the mode.
    pub fn clear_all(&mut self) -> Action {
        self.record();
        self.collections = Collections::default();
        self.selected = None;
        self.pending_line = None;
        self.changed()
    }

    pub fn undo(&mut self) -> Action {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(&current) else {
            return Action::None;
        };
        self.apply(previous);
        self.changed()
    }

    pub fn redo(&mut self) -> Action {
        let current = self.snapshot();
        let Some(next) = self.history.redo(&current) else {
            return Action::None;
        };
        self.apply(next);
        self.changed()
    }

    // --- Drag gestures ---

    /// Open a drag gesture on the current selection, recording one undo step.
    pub fn begin_drag(&mut self) {
        if self.dragging || self.valid_selection().is_none() {
            return;
        }
        self.record();
        self.dragging = true;
    }

    /// Close the current drag gesture.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Set the radius of the selected circle, clamped to [`MIN_RADIUS`].
    ///
    /// Encircle mode with the select tool only. Ovals scale their vertical
    /// radius to keep their aspect ratio. Does not record history on its own.
    pub fn resize_selected(&mut self, new_radius: f64) -> Action {
        if self.mode != Mode::Encircle || self.tool != Tool::Select || !new_radius.is_finite() {
            return Action::None;
        }
        let Some(index) = self.valid_selection() else {
            return Action::None;
        };
        let radius = new_radius.max(MIN_RADIUS);
        match &mut self.collections.circles[index] {
            Enclosure::Circle(c) => c.radius = radius,
            Enclosure::Oval(o) => {
                let ratio = o.radius_y / o.radius_x;
                o.radius_x = radius;
                o.radius_y = (radius * ratio).max(MIN_RADIUS);
            }
        }
        self.changed()
    }

    /// Move the selected primitive so it is anchored at (`x`, `y`).
    ///
    /// Circles and shapes move their center; lines move their start point and
    /// carry the end point along. Does not record history on its own.
    pub fn move_selected(&mut self, x: f64, y: f64) -> Action {
        if !x.is_finite() || !y.is_finite() {
            return Action::None;
        }
        let Some(index) = self.valid_selection() else {
            return Action::None;
        };
        match self.mode {
            Mode::Encircle => self.collections.circles[index].set_center(Point::new(x, y)),
            Mode::Matching => {
                let line = &mut self.collections.lines[index];
                let dx = x - line.points[0];
                let dy = y - line.points[1];
                line.points = [x, y, line.points[2] + dx, line.points[3] + dy];
            }
            Mode::Pattern => {
                let shape = &mut self.collections.shapes[index];
                shape.x = x;
                shape.y = y;
            }
        }
        self.changed()
    }

    // --- Internals ---

    fn valid_selection(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.collections.active_len(self.mode))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot { collections: self.collections.clone(), selected: self.selected }
    }

    fn record(&mut self) {
        let before = self.snapshot();
        self.history.record(before);
    }

    fn apply(&mut self, snapshot: Snapshot) {
        self.collections = snapshot.collections;
        self.selected = snapshot.selected;
        self.dragging = false;
    }

    fn changed(&self) -> Action {
        Action::AnswerChanged(self.payload())
    }
}
