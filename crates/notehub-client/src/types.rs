//! Wire types private to the NoteHub API client.

use serde::Deserialize;

/// Error body returned by the NoteHub API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub message: String,
}

/// Turn a failed response body into a readable message.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
