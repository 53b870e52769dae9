//! Environment-driven configuration.
//!
//! # Responsibility
//! - Read generation-service settings from the process environment.
//! - Keep variable names and defaults in one place.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - A missing API key is not a configuration error; insight requests fall
//!   back to the local reflection instead.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Name used by earlier front-ends for the same credential.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";
pub const GEMINI_MODEL_VAR: &str = "LIFEGRID_GEMINI_MODEL";
pub const GEMINI_BASE_URL_VAR: &str = "LIFEGRID_GEMINI_BASE_URL";
pub const GEMINI_TIMEOUT_VAR: &str = "LIFEGRID_GEMINI_TIMEOUT_SECS";

const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loading error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { name, value } => write!(f, "invalid value `{value}` for {name}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.8,
            top_p: 0.95,
        }
    }
}

impl GeminiConfig {
    /// Loads settings from the environment, applying defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_key: env_optional(GEMINI_API_KEY_VAR).or_else(|| env_optional(LEGACY_API_KEY_VAR)),
            model: env_optional(GEMINI_MODEL_VAR).unwrap_or(defaults.model),
            base_url: env_optional(GEMINI_BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs: env_u64(GEMINI_TIMEOUT_VAR, defaults.timeout_secs)?,
            ..defaults
        })
    }
}

/// Returns a trimmed, non-empty environment variable.
pub fn env_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses an unsigned environment variable, or returns `default` when unset.
pub fn env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_optional(name) {
        Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{env_u64, ConfigError, GeminiConfig};

    #[test]
    fn defaults_match_reflection_settings() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.top_p, 0.95);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn env_u64_rejects_garbage() {
        std::env::set_var("LIFEGRID_TEST_TIMEOUT_GARBAGE", "soon");
        assert_eq!(
            env_u64("LIFEGRID_TEST_TIMEOUT_GARBAGE", 5),
            Err(ConfigError::Invalid {
                name: "LIFEGRID_TEST_TIMEOUT_GARBAGE",
                value: "soon".to_string()
            })
        );
        assert_eq!(env_u64("LIFEGRID_TEST_TIMEOUT_UNSET", 5), Ok(5));
    }
}
