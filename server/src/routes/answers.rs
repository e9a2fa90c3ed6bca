//! Answer grading routes.
//!
//! `POST /api/answers/evaluate` grades a stored interactive answer with the
//! tolerance rules. `POST /api/answers/analyze` grades a captured canvas
//! image through the vision oracle (or the simulated fallback) and stores
//! the capture.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::services::analysis::{self, Annotation, EvaluationDetails, TaskKind};
use crate::services::capture;
use crate::services::tolerance;
use crate::state::AppState;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub question_type: String,
    pub user_answer: Value,
    pub correct_answer: Value,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_data: String,
    pub question_id: String,
    #[serde(default)]
    pub question_text: String,
    /// Explicit `null` is treated like an empty drawing.
    #[serde(default)]
    pub user_drawing: Option<Vec<Value>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub task_kind: Option<TaskKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub feedback: String,
    pub score: u8,
    pub details: EvaluationDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(code: &'static str, error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { success: false, error, code }))
}

fn rejected(rejection: &JsonRejection) -> ApiError {
    bad_request("E_BAD_REQUEST", rejection.body_text())
}

/// Stored answers arrive either as JSON text or as an already-parsed array.
fn raw_answer(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/answers/evaluate` — tolerance grading, never errors on content.
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| rejected(&e))?;
    let correct = tolerance::evaluate_interactive_answer(
        &req.question_type,
        &raw_answer(&req.user_answer),
        &raw_answer(&req.correct_answer),
        state.config.pairing,
    );
    info!(question_type = %req.question_type, correct, "answers: evaluated");
    Ok(Json(EvaluateResponse { correct }))
}

/// `POST /api/answers/analyze` — vision-assisted grading of a captured image.
///
/// Only a malformed body or an undecodable image is an error. Oracle trouble
/// degrades to a simulated grade and a failed capture write drops `imagePath`.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| rejected(&e))?;

    let captured = capture::decode_data_url(&req.image_data).map_err(|e| {
        warn!(question_id = %req.question_id, error = %e, "answers: image decode failed");
        bad_request(e.error_code(), e.to_string())
    })?;

    let task = TaskKind::resolve(req.task_kind, &req.question_text);
    let drawing = Annotation::parse_drawing(req.user_drawing.as_deref().unwrap_or_default());

    let (stored, evaluation) = tokio::join!(
        state.images.save(&req.question_id, &captured),
        analysis::analyze_capture(
            state.oracle.as_deref(),
            &captured.image,
            &drawing,
            task,
            req.correct_answer.as_deref(),
            state.config.analysis_timeout,
        ),
    );

    let image_path = match stored {
        Ok(path) => Some(path.display().to_string()),
        Err(e) => {
            warn!(question_id = %req.question_id, error = %e, code = e.error_code(), "answers: capture not stored");
            None
        }
    };

    info!(
        question_id = %req.question_id,
        task = ?task,
        score = evaluation.score,
        fallback_used = evaluation.details.fallback_used,
        "answers: analyzed"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        feedback: evaluation.feedback,
        score: evaluation.score,
        details: evaluation.details,
        image_path,
    }))
}

#[cfg(test)]
#[path = "answers_test.rs"]
mod tests;
