//! Google Cloud Vision `images:annotate` client.
//!
//! Thin HTTP wrapper. Object localization and text detection ride in a single
//! batched request so both run concurrently on the provider side. Pure
//! parsing in `parse_response` for testability: it maps normalized object
//! vertices into pixel space using the image dimensions.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use canvas::primitive::Point;
use serde::{Deserialize, Serialize};

use super::config::{VisionConfig, VisionTimeouts};
use super::types::{BoundingBox, DetectedObject, ImageInput, TextDetection, VisionError, VisionResult};

// =============================================================================
// CLIENT
// =============================================================================

pub struct GoogleVisionClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl GoogleVisionClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let VisionTimeouts { request_secs, connect_secs } = config.timeouts;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_secs))
            .connect_timeout(Duration::from_secs(connect_secs))
            .build()
            .map_err(|e| VisionError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, base_url: config.base_url, max_results: config.max_results })
    }

    /// Run object localization and text detection on one image.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] on transport failure, non-200 status, an
    /// in-body error, or an unparseable response.
    pub async fn annotate(&self, image: &ImageInput) -> Result<VisionResult, VisionError> {
        let content = STANDARD.encode(&image.bytes);
        let features = [
            Feature { kind: "OBJECT_LOCALIZATION", max_results: self.max_results },
            Feature { kind: "TEXT_DETECTION", max_results: self.max_results },
        ];
        let body = ApiRequest { requests: [AnnotateRequest { image: ImageContent { content: &content }, features: &features }] };

        let response = self
            .http
            .post(format!("{}/images:annotate", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| VisionError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(VisionError::ApiResponse { status, body: text });
        }

        parse_response(&text, image.width, image.height)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ApiRequest<'a> {
    requests: [AnnotateRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    image: ImageContent<'a>,
    features: &'a [Feature],
}

#[derive(Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    localized_object_annotations: Vec<ObjectAnnotation>,
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectAnnotation {
    name: String,
    #[serde(default)]
    score: f64,
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextAnnotation {
    #[serde(default)]
    description: String,
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
    #[serde(default)]
    normalized_vertices: Vec<Vertex>,
}

/// Zero-valued coordinates are omitted on the wire.
#[derive(Deserialize)]
struct Vertex {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

/// Map an `images:annotate` response into pixel-space detections.
fn parse_response(json: &str, width: u32, height: u32) -> Result<VisionResult, VisionError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| VisionError::ApiParse(e.to_string()))?;
    let Some(first) = api.responses.into_iter().next() else {
        return Ok(VisionResult::default());
    };

    if let Some(status) = first.error {
        let code = u16::try_from(status.code).unwrap_or(500);
        return Err(VisionError::ApiResponse { status: code, body: status.message });
    }

    let (w, h) = (f64::from(width), f64::from(height));
    let objects = first
        .localized_object_annotations
        .into_iter()
        .filter_map(|obj| {
            let poly = obj.bounding_poly?;
            let bounding_box = poly_to_pixels(&poly, w, h)?;
            Some(DetectedObject { name: obj.name, confidence: obj.score, bounding_box })
        })
        .collect();

    let text_detections = first
        .text_annotations
        .into_iter()
        .map(|t| TextDetection {
            text: t.description,
            bounding_box: t.bounding_poly.and_then(|p| poly_to_pixels(&p, w, h)),
        })
        .collect();

    Ok(VisionResult { objects, text_detections })
}

/// Prefer absolute vertices; otherwise scale normalized ones by the image size.
fn poly_to_pixels(poly: &BoundingPoly, width: f64, height: f64) -> Option<BoundingBox> {
    let points: Vec<Point> = if poly.vertices.is_empty() {
        poly.normalized_vertices
            .iter()
            .map(|v| Point::new(v.x * width, v.y * height))
            .collect()
    } else {
        poly.vertices.iter().map(|v| Point::new(v.x, v.y)).collect()
    };
    BoundingBox::enclosing(&points)
}

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;
