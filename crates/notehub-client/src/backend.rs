//! `reqwest` implementation of the NoteHub notes API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use notehub_core::{CreateNoteRequest, Error, Note, NotesApi, NotesPage, NotesQuery, Result};

use crate::config::NoteHubConfig;
use crate::types::error_message;

/// NoteHub API client.
#[derive(Clone)]
pub struct NoteHubClient {
    client: Client,
    config: NoteHubConfig,
}

impl NoteHubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NoteHubConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            authenticated = config.token.is_some(),
            "Initializing NoteHub client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(NoteHubConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &NoteHubConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map a response to its decoded body or an upstream error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))
    }
}

/// Query string for a notes read. Empty search and absent tag are omitted.
fn notes_params(query: &NotesQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("perPage", query.per_page.to_string()),
    ];
    if !query.search.is_empty() {
        params.push(("search", query.search.clone()));
    }
    if let Some(tag) = query.tag {
        params.push(("tag", tag.to_string()));
    }
    params
}

#[async_trait]
impl NotesApi for NoteHubClient {
    #[instrument(skip(self), fields(subsystem = "client", op = "fetch_notes"))]
    async fn fetch_notes(&self, query: &NotesQuery) -> Result<NotesPage> {
        let start = Instant::now();
        let response = self
            .authorize(self.client.get(self.url("/notes")))
            .query(&notes_params(query))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let page: NotesPage = Self::decode(response).await?;
        debug!(
            result_count = page.notes.len(),
            total_pages = page.total_pages,
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched notes"
        );
        Ok(page)
    }

    #[instrument(skip(self, note), fields(subsystem = "client", op = "create_note", tag = %note.tag))]
    async fn create_note(&self, note: &CreateNoteRequest) -> Result<Note> {
        let start = Instant::now();
        let response = self
            .authorize(self.client.post(self.url("/notes")))
            .json(note)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let created: Note = Self::decode(response).await?;
        debug!(
            note_id = %created.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Created note"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::NoteTag;

    #[test]
    fn test_notes_params_omit_empty_search_and_tag() {
        let params = notes_params(&NotesQuery::first_page(None));
        assert_eq!(
            params,
            vec![("page", "1".to_string()), ("perPage", "12".to_string())]
        );
    }

    #[test]
    fn test_notes_params_include_search_and_tag() {
        let query = NotesQuery {
            page: 3,
            per_page: 12,
            search: "plan".to_string(),
            tag: Some(NoteTag::Meeting),
        };
        let params = notes_params(&query);
        assert!(params.contains(&("search", "plan".to_string())));
        assert!(params.contains(&("tag", "Meeting".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = NoteHubConfig {
            base_url: "notehub.local".to_string(),
            ..Default::default()
        };
        assert!(matches!(NoteHubClient::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = NoteHubClient::new(NoteHubConfig {
            base_url: "http://localhost:9000/api/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("/notes"), "http://localhost:9000/api/notes");
    }
}
