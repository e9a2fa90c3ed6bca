//! Capture service — decode submitted canvas rasters and persist them.
//!
//! DESIGN
//! ======
//! The browser posts the rendered canvas as a `data:image/<type>;base64,...`
//! URL. Decoding validates the payload as a real raster (the vision oracle
//! needs its pixel dimensions to denormalize detections), so a bad image is
//! rejected here before any analysis runs. Persistence is best-effort: the
//! route logs a failed write and answers without an `imagePath`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};

use crate::vision::types::ImageInput;

/// Longest question-id prefix kept in a capture file name.
const MAX_ID_CHARS: usize = 64;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("image data is not a base64 data URL")]
    NotDataUrl,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image data is not valid base64: {0}")]
    Base64(String),
    #[error("image could not be decoded: {0}")]
    Decode(String),
    #[error("capture write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl crate::error::ErrorCode for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotDataUrl => "E_NOT_DATA_URL",
            Self::UnsupportedType(_) => "E_UNSUPPORTED_IMAGE_TYPE",
            Self::Base64(_) => "E_IMAGE_BASE64",
            Self::Decode(_) => "E_IMAGE_DECODE",
            Self::Io(_) => "E_CAPTURE_IO",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// A validated raster plus the file extension it is stored under.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub image: ImageInput,
    pub extension: &'static str,
}

/// Decode a `data:image/...;base64,` URL into raw bytes and pixel dimensions.
///
/// # Errors
///
/// Returns [`CaptureError`] when the URL is not a base64 image data URL, the
/// declared type is unsupported, or the bytes are not a decodable image.
pub fn decode_data_url(data_url: &str) -> Result<CapturedImage, CaptureError> {
    let rest = data_url.trim().strip_prefix("data:").ok_or(CaptureError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(CaptureError::NotDataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(CaptureError::NotDataUrl)?;
    let subtype = mime.strip_prefix("image/").ok_or_else(|| CaptureError::UnsupportedType(mime.to_string()))?;
    if !matches!(subtype, "png" | "jpeg" | "jpg") {
        return Err(CaptureError::UnsupportedType(mime.to_string()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CaptureError::Base64(e.to_string()))?;

    let reader = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| CaptureError::Decode(e.to_string()))?;
    let extension = match reader.format() {
        Some(ImageFormat::Png) => "png",
        Some(ImageFormat::Jpeg) => "jpg",
        other => return Err(CaptureError::Decode(format!("unrecognized raster format {other:?}"))),
    };
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CaptureError::Decode(e.to_string()))?;

    Ok(CapturedImage { image: ImageInput { bytes, width, height }, extension })
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Directory-backed store for captured answer images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `capture` to `{root}/{question_id}_{unix_ms}.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Io`] if the directory or file cannot be written.
    pub async fn save(&self, question_id: &str, capture: &CapturedImage) -> Result<PathBuf, CaptureError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self
            .root
            .join(capture_file_name(question_id, unix_millis(), capture.extension));
        tokio::fs::write(&path, &capture.image.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = capture.image.bytes.len(), "capture: image stored");
        Ok(path)
    }
}

/// File name for a capture. The id is reduced to `[A-Za-z0-9_-]` so callers
/// cannot steer the write outside the store root.
#[must_use]
pub fn capture_file_name(question_id: &str, millis: i128, extension: &str) -> String {
    let mut id: String = question_id
        .chars()
        .take(MAX_ID_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() {
        id.push_str("capture");
    }
    format!("{id}_{millis}.{extension}")
}

fn unix_millis() -> i128 {
    time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod tests;
