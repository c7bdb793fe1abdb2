//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `AGROLINK_API_BASE_URL` - Base URL of the AgroLink API
//!   (default: `http://localhost:8080/api/v1`)
//! - `AGROLINK_SESSION_FILE` - Path of the persisted session file
//!   (default: `.agrolink-session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_SESSION_FILE: &str = ".agrolink-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the AgroLink API, without a trailing slash.
    pub base_url: String,
    /// Path of the JSON file holding the persisted session.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `AGROLINK_API_BASE_URL` is set but not a
    /// valid absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("AGROLINK_API_BASE_URL", DEFAULT_BASE_URL);
        let base_url = validate_base_url("AGROLINK_API_BASE_URL", &base_url)?;

        let session_file = PathBuf::from(get_env_or_default(
            "AGROLINK_SESSION_FILE",
            DEFAULT_SESSION_FILE,
        ));

        Ok(Self {
            base_url,
            session_file,
        })
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Used by tests and by callers that manage their own settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(
        base_url: impl Into<String>,
        session_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let base_url = validate_base_url("base_url", &base_url.into())?;
        Ok(Self {
            base_url,
            session_file: session_file.into(),
        })
    }
}

/// Validate and normalize a base URL (strips any trailing slash).
fn validate_base_url(name: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config =
            ClientConfig::new("https://api.agrolink.id/api/v1/", "session.json").expect("config");
        assert_eq!(config.base_url, "https://api.agrolink.id/api/v1");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ClientConfig::new("not a url", "session.json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = ClientConfig::new("ftp://agrolink.id", "session.json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}
