//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The answer form posts submitted drawings here for grading. Everything is
//! JSON over HTTP; the router adds permissive CORS for the browser host and
//! request tracing.

pub mod answers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Canvas captures ride inline as base64 data URLs.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Grading API routes.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/answers/evaluate", post(answers::evaluate))
        .route("/api/answers/analyze", post(answers::analyze))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
