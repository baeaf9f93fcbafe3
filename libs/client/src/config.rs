//! Client configuration
//!
//! Values come from built-in defaults, overridden by environment variables
//! prefixed with `MANGA_READER_`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::ClientResult;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_SESSION_FILE: &str = ".manga-reader/session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the manga API, without a trailing slash
    pub api_url: String,
    /// Per-request timeout in seconds; `0` disables it
    pub request_timeout_secs: u64,
    /// Where the session token is persisted
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MANGA_READER_API_URL`: API base URL (default: "http://localhost:8000")
    /// - `MANGA_READER_REQUEST_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `MANGA_READER_SESSION_FILE`: token file (default: ".manga-reader/session.json")
    pub fn from_env() -> ClientResult<Self> {
        let settings = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("session_file", DEFAULT_SESSION_FILE)?
            .add_source(Environment::with_prefix("MANGA_READER").try_parsing(true))
            .build()?;

        let mut config: ClientConfig = settings.try_deserialize()?;
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Configuration pointing at `api_url`, defaults elsewhere
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
