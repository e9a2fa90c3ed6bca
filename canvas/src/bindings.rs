//! Browser entry point: exposes [`DrawingSession`] to the JavaScript host.
//!
//! The host wires pointer and toolbar events to these methods. Mutating
//! methods return the normalized answer as a JSON string when the answer
//! changed, or `undefined` when the call was ignored, so the host only
//! touches form state when there is something new to store.

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use wasm_bindgen::prelude::*;

use crate::primitive::{Point, ShapeKind};
use crate::session::{Action, Collections, DrawingSession, Mode, Tool};

/// Serialize an action's payload, if it carries one.
fn payload_json(action: Action) -> Result<Option<String>, serde_json::Error> {
    match action {
        Action::None => Ok(None),
        Action::AnswerChanged(payload) => serde_json::to_string(&payload).map(Some),
    }
}

fn emit(action: Action) -> Result<Option<String>, JsError> {
    payload_json(action).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_mode(mode: &str) -> Result<Mode, JsError> {
    Mode::parse(mode).ok_or_else(|| JsError::new(&format!("unknown drawing mode: {mode}")))
}

#[wasm_bindgen]
pub struct DrawingCanvas {
    session: DrawingSession,
}

#[wasm_bindgen]
impl DrawingCanvas {
    /// Start an empty session. `mode` is `encircle`, `matching`, or `pattern`.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str) -> Result<DrawingCanvas, JsError> {
        Ok(Self { session: DrawingSession::new(parse_mode(mode)?) })
    }

    /// Rehydrate from collections previously returned by [`DrawingCanvas::snapshot`].
    pub fn restore(mode: &str, collections_json: &str) -> Result<DrawingCanvas, JsError> {
        let collections: Collections =
            serde_json::from_str(collections_json).map_err(|e| JsError::new(&e.to_string()))?;
        let session =
            DrawingSession::restore(parse_mode(mode)?, collections).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { session })
    }

    /// Current collections as JSON, for the parent form to hold on navigation.
    pub fn snapshot(&self) -> Result<String, JsError> {
        serde_json::to_string(self.session.collections()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Start point of a line awaiting its second click, as `[x, y]`, for the rubber-band preview.
    pub fn pending_line(&self) -> Option<Vec<f64>> {
        self.session.pending_line().map(|p| vec![p.x, p.y])
    }

    /// Current normalized answer as JSON.
    pub fn answer(&self) -> Result<String, JsError> {
        self.session
            .payload()
            .to_json()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn set_select_tool(&mut self, select: bool) {
        self.session.set_tool(if select { Tool::Select } else { Tool::Draw });
    }

    /// Hit-test and select; returns the selected index.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<usize> {
        self.session.select_at(Point::new(x, y))
    }

    pub fn add_circle(&mut self, x: f64, y: f64, oval: bool) -> Result<Option<String>, JsError> {
        emit(self.session.add_circle(Point::new(x, y), oval))
    }

    pub fn add_pattern_shape(&mut self, x: f64, y: f64, kind: &str) -> Result<Option<String>, JsError> {
        let kind = ShapeKind::parse(kind).ok_or_else(|| JsError::new(&format!("unknown shape kind: {kind}")))?;
        emit(self.session.add_pattern_shape(Point::new(x, y), kind))
    }

    pub fn begin_line(&mut self, x: f64, y: f64) {
        self.session.begin_line(Point::new(x, y));
    }

    pub fn end_line(&mut self, x: f64, y: f64) -> Result<Option<String>, JsError> {
        emit(self.session.end_line(Point::new(x, y)))
    }

    pub fn cancel_line(&mut self) {
        self.session.cancel_line();
    }

    pub fn delete_selected(&mut self) -> Result<Option<String>, JsError> {
        emit(self.session.delete_selected())
    }

    pub fn clear_all(&mut self) -> Result<Option<String>, JsError> {
        emit(self.session.clear_all())
    }

    pub fn undo(&mut self) -> Result<Option<String>, JsError> {
        emit(self.session.undo())
    }

    pub fn redo(&mut self) -> Result<Option<String>, JsError> {
        emit(self.session.redo())
    }

    pub fn begin_drag(&mut self) {
        self.session.begin_drag();
    }

    pub fn end_drag(&mut self) {
        self.session.end_drag();
    }

    pub fn resize_selected(&mut self, radius: f64) -> Result<Option<String>, JsError> {
        emit(self.session.resize_selected(radius))
    }

    pub fn move_selected(&mut self, x: f64, y: f64) -> Result<Option<String>, JsError> {
        emit(self.session.move_selected(x, y))
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }
}
