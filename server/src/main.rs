mod config;
mod error;
mod routes;
mod services;
mod state;
mod vision;

use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env loaded"),
    }

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, code = error::ErrorCode::error_code(&e), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Initialize vision oracle (non-fatal: analysis falls back to simulated grades if config missing).
    let oracle: Option<Arc<dyn vision::VisionOracle>> = match vision::VisionClient::from_env() {
        Ok(client) => {
            tracing::info!(base_url = client.base_url(), "vision client initialized");
            Some(Arc::new(client) as Arc<dyn vision::VisionOracle>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "vision client not configured; analysis will use simulated grades");
            None
        }
    };

    let port = config.port;
    let state = state::AppState::new(config, oracle);
    tracing::info!(
        capture_dir = %state.images.root().display(),
        pairing = ?state.config.pairing,
        analysis_timeout_secs = state.config.analysis_timeout.as_secs(),
        vision = state.oracle.is_some(),
        "grading config loaded"
    );
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%port, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%port, "answer grading server listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
