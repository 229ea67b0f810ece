//! NoteHub API client configuration.
//!
//! Environment variables:
//! - `NOTEHUB_API_URL`: API base URL (default: the public NoteHub API)
//! - `NOTEHUB_TOKEN`: bearer token (optional)
//! - `NOTEHUB_TIMEOUT_SECS`: request timeout in seconds (default: 30)

use notehub_core::{defaults, Error, Result};
use tracing::warn;

/// Configuration for [`crate::NoteHubClient`].
#[derive(Debug, Clone)]
pub struct NoteHubConfig {
    /// Base URL of the API, without trailing `/notes`.
    pub base_url: String,
    /// Bearer token sent as `Authorization` when set.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for NoteHubConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::NOTEHUB_API_URL.to_string(),
            token: None,
            timeout_seconds: defaults::NOTEHUB_TIMEOUT_SECS,
        }
    }
}

impl NoteHubConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let timeout_seconds = match std::env::var("NOTEHUB_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    value = %raw,
                    "Invalid NOTEHUB_TIMEOUT_SECS, using {}s",
                    defaults::NOTEHUB_TIMEOUT_SECS
                );
                defaults::NOTEHUB_TIMEOUT_SECS
            }),
            Err(_) => defaults::NOTEHUB_TIMEOUT_SECS,
        };

        Self {
            base_url: std::env::var("NOTEHUB_API_URL")
                .unwrap_or_else(|_| defaults::NOTEHUB_API_URL.to_string()),
            token: std::env::var("NOTEHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_seconds,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("NoteHub base_url cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "NoteHub base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config(
                "NoteHub timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}
