//! Vision types — oracle-neutral detection results and errors.
//!
//! The grader only ever sees these types. Provider wire formats stay inside
//! the provider module; this module owns the pixel-space geometry the
//! evaluator tests drawings against.

use canvas::primitive::Point;
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by vision oracle operations.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the oracle failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The oracle returned a non-success HTTP status or an in-body error.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The oracle response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The oracle did not answer within the analysis deadline.
    #[error("vision analysis timed out after {secs}s")]
    Timeout { secs: u64 },

    /// No oracle is configured on this server.
    #[error("vision oracle not configured")]
    NotConfigured,
}

impl crate::error::ErrorCode for VisionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Timeout { .. } => "E_VISION_TIMEOUT",
            Self::NotConfigured => "E_VISION_NOT_CONFIGURED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::Timeout { .. } | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Axis-aligned box in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box enclosing `points`. `None` for an empty slice.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// The four corners followed by the center.
    #[must_use]
    pub fn sample_points(&self) -> [Point; 5] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
            self.center(),
        ]
    }

    /// Whether `p` lies inside the box grown by `margin` on every side.
    #[must_use]
    pub fn contains_with_margin(&self, p: Point, margin: f64) -> bool {
        p.x >= self.min_x - margin && p.x <= self.max_x + margin && p.y >= self.min_y - margin && p.y <= self.max_y + margin
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One localized object reported by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    pub name: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

/// One OCR text span reported by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDetection {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Everything the oracle saw in one captured image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionResult {
    pub objects: Vec<DetectedObject>,
    pub text_detections: Vec<TextDetection>,
}

impl VisionResult {
    /// Mean detection confidence, or `0.0` when nothing was detected.
    #[must_use]
    pub fn mean_confidence(&self) -> f64 {
        if self.objects.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.objects.len() as f64;
        self.objects.iter().map(|o| o.confidence).sum::<f64>() / n
    }
}

/// A decoded raster ready for analysis.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// ORACLE TRAIT
// =============================================================================

/// Object-localization / OCR oracle. Enables mocking in tests.
#[async_trait::async_trait]
pub trait VisionOracle: Send + Sync {
    /// Detect objects and text in `image`.
    ///
    /// # Errors
    ///
    /// Returns a [`VisionError`] if the request fails or the response is malformed.
    async fn analyze(&self, image: &ImageInput) -> Result<VisionResult, VisionError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
