//! Server configuration.
//!
//! Environment variables:
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:3000`)
//! - `NOTEHUB_FORM_MODE`: `validated` or `draft` (default `validated`)
//! - `QUERY_STALE_SECS`: query cache freshness window (default 60)
//! - `QUERY_CACHE_CAPACITY`: entries kept per session query cache (default 256)
//! - `SESSION_CAPACITY`: live client sessions kept in memory (default 1024)
//!
//! The NoteHub API settings are read by [`notehub_client::NoteHubConfig`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use notehub_core::{defaults, Error, Result};
use tracing::warn;

/// Which note form the server renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    /// Schema-validated form; a successful create invalidates cached notes.
    #[default]
    Validated,
    /// Draft-backed form; submits the draft as-is.
    Draft,
}

impl FormMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::Validated => "validated",
            FormMode::Draft => "draft",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "validated" => Ok(FormMode::Validated),
            "draft" => Ok(FormMode::Draft),
            other => Err(Error::Config(format!(
                "NOTEHUB_FORM_MODE must be 'validated' or 'draft', got: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub form_mode: FormMode,
    pub query_stale_secs: u64,
    pub query_cache_capacity: usize,
    pub session_capacity: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: defaults::SERVER_PORT,
            form_mode: FormMode::default(),
            query_stale_secs: defaults::QUERY_STALE_SECS,
            query_cache_capacity: defaults::QUERY_CACHE_CAPACITY,
            session_capacity: defaults::SESSION_CAPACITY,
        }
    }
}

impl WebConfig {
    /// Load from environment variables. Malformed numbers fall back to
    /// defaults; an unknown form mode is an error.
    pub fn from_env() -> Result<Self> {
        let form_mode = match std::env::var("NOTEHUB_FORM_MODE") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => FormMode::default(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", defaults::SERVER_PORT),
            form_mode,
            query_stale_secs: env_or("QUERY_STALE_SECS", defaults::QUERY_STALE_SECS),
            query_cache_capacity: env_or("QUERY_CACHE_CAPACITY", defaults::QUERY_CACHE_CAPACITY),
            session_capacity: env_or("SESSION_CAPACITY", defaults::SESSION_CAPACITY),
        })
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.query_stale_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "Invalid {}, using {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
