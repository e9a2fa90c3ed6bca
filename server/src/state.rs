//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Grading is stateless per request, so the state only carries parsed
//! config, the optional vision oracle, and the capture store.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::capture::ImageStore;
use crate::vision::VisionOracle;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Optional vision oracle. `None` if vision env vars are not configured.
    pub oracle: Option<Arc<dyn VisionOracle>>,
    pub images: ImageStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, oracle: Option<Arc<dyn VisionOracle>>) -> Self {
        let images = ImageStore::new(config.capture_dir.clone());
        Self { config: Arc::new(config), oracle, images }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
