//! Vision — object-detection / OCR oracle used to grade captured drawings.
//!
//! DESIGN
//! ======
//! The grader depends only on the [`VisionOracle`] trait so tests can swap in
//! canned detections. [`VisionClient::from_env`] builds the production
//! Google Cloud Vision client; when its config is absent the server runs
//! without an oracle and every analysis takes the fallback path.

pub mod config;
pub mod google;
pub mod types;

use config::VisionConfig;
pub use types::VisionOracle;
use types::{ImageInput, VisionError, VisionResult};

/// Configured production oracle.
pub struct VisionClient {
    inner: google::GoogleVisionClient,
    base_url: String,
}

impl VisionClient {
    /// Build a vision client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, VisionError> {
        Self::from_config(VisionConfig::from_env()?)
    }

    /// Build a vision client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: VisionConfig) -> Result<Self, VisionError> {
        let base_url = config.base_url.clone();
        Ok(Self { inner: google::GoogleVisionClient::new(config)?, base_url })
    }

    /// Endpoint the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl VisionOracle for VisionClient {
    async fn analyze(&self, image: &ImageInput) -> Result<VisionResult, VisionError> {
        self.inner.annotate(image).await
    }
}
