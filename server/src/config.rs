//! Server configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::services::tolerance::Pairing;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CAPTURE_DIR: &str = "uploads/captures";
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid ANSWER_PAIRING: {0} (expected positional or nearest)")]
    InvalidPairing(String),
    #[error("invalid ANALYSIS_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPort(_) => "E_CONFIG_PORT",
            Self::InvalidPairing(_) => "E_CONFIG_PAIRING",
            Self::InvalidTimeout(_) => "E_CONFIG_TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub capture_dir: PathBuf,
    pub pairing: Pairing,
    pub analysis_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            capture_dir: PathBuf::from(DEFAULT_CAPTURE_DIR),
            pairing: Pairing::Positional,
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CAPTURE_DIR`: default `uploads/captures`
    /// - `ANSWER_PAIRING`: `positional` (default) or `nearest`
    /// - `ANALYSIS_TIMEOUT_SECS`: deadline for one oracle call, default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str| std::env::var(key).ok();
        Ok(Self {
            port: parse_port(var("PORT").as_deref())?,
            capture_dir: var("CAPTURE_DIR").map_or_else(|| PathBuf::from(DEFAULT_CAPTURE_DIR), PathBuf::from),
            pairing: parse_pairing(var("ANSWER_PAIRING").as_deref())?,
            analysis_timeout: parse_timeout(var("ANALYSIS_TIMEOUT_SECS").as_deref())?,
        })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PORT);
    };
    raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn parse_pairing(raw: Option<&str>) -> Result<Pairing, ConfigError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "positional") => Ok(Pairing::Positional),
        Some("nearest" | "any_order") => Ok(Pairing::AnyOrder),
        Some(_) => Err(ConfigError::InvalidPairing(raw.unwrap_or_default().to_string())),
    }
}

fn parse_timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS));
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
