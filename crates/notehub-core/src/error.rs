//! Error types for NoteHub.

use thiserror::Error;

/// Result type alias using NoteHub's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for NoteHub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network request failed before a response arrived
    #[error("Request error: {0}")]
    Request(String),

    /// The NoteHub API answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures that came from talking to the NoteHub API.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Request(_) | Error::Upstream { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Serialization(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}
