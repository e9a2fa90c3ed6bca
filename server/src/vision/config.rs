//! Vision oracle configuration parsed from environment variables.

use super::types::VisionError;

pub const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com/v1";
pub const DEFAULT_VISION_MAX_RESULTS: u32 = 10;
pub const DEFAULT_VISION_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VISION_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_results: u32,
    pub timeouts: VisionTimeouts,
}

impl VisionConfig {
    /// Build typed vision config from environment variables.
    ///
    /// Required:
    /// - `VISION_API_KEY_ENV` (names the env var containing the key)
    ///
    /// Optional:
    /// - `VISION_BASE_URL`: default Google Cloud Vision v1 endpoint
    /// - `VISION_MAX_RESULTS`: default 10, must be at least 1
    /// - `VISION_REQUEST_TIMEOUT_SECS`: default 10
    /// - `VISION_CONNECT_TIMEOUT_SECS`: default 5
    pub fn from_env() -> Result<Self, VisionError> {
        let key_var = std::env::var("VISION_API_KEY_ENV")
            .map_err(|_| VisionError::MissingApiKey { var: "VISION_API_KEY_ENV".into() })?;
        let api_key = std::env::var(&key_var).map_err(|_| VisionError::MissingApiKey { var: key_var.clone() })?;

        let base_url = std::env::var("VISION_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_VISION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let max_results = parse_max_results(std::env::var("VISION_MAX_RESULTS").ok().as_deref())?;
        let timeouts = VisionTimeouts {
            request_secs: env_parse_u64("VISION_REQUEST_TIMEOUT_SECS", DEFAULT_VISION_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("VISION_CONNECT_TIMEOUT_SECS", DEFAULT_VISION_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, base_url, max_results, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_max_results(raw: Option<&str>) -> Result<u32, VisionError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_VISION_MAX_RESULTS);
    };
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(VisionError::ConfigParse(format!("invalid VISION_MAX_RESULTS: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
