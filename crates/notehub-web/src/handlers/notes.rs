use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use notehub_core::{defaults, Error, NotesPage, NotesQuery, QueryKey, TagFilter};

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub search: String,
    pub tag: Option<String>,
}

impl NotesParams {
    pub fn into_query(self) -> Result<NotesQuery, Error> {
        let page = self.page.unwrap_or(defaults::FIRST_PAGE);
        let per_page = self.per_page.unwrap_or(defaults::NOTES_PER_PAGE);
        if page == 0 {
            return Err(Error::InvalidInput("page must be at least 1".to_string()));
        }
        if per_page == 0 {
            return Err(Error::InvalidInput("perPage must be at least 1".to_string()));
        }
        Ok(NotesQuery {
            page,
            per_page,
            search: self.search,
            tag: TagFilter::from_segment(self.tag.as_deref()).as_tag(),
        })
    }
}

/// `GET /api/notes`: one page of notes, read through the session cache.
pub async fn list_notes(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<NotesParams>,
) -> Result<Response, ApiError> {
    let query = params.into_query()?;
    let key = QueryKey::notes(query.clone());
    let api = state.api.clone();

    let page: NotesPage = session
        .query_client()
        .fetch_query(key, || async move { api.fetch_notes(&query).await })
        .await?;

    Ok(session.respond(Json(page)))
}
