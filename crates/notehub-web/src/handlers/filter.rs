//! `/notes/filter` pages.
//!
//! Each request prefetches the first page of notes for the resolved tag into
//! its own [`QueryClient`], renders the list with that cache's dehydrated
//! state embedded, and hydrates the same state into the session cache.

use axum::extract::{Path, State};
use axum::response::{Html, Response};
use tracing::debug;

use notehub_core::{NotesPage, NotesQuery, PageMetadata, QueryKey, TagFilter};
use notehub_query::QueryClient;

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

pub async fn filter_all(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ApiError> {
    render_filter_page(&state, &session, None).await
}

pub async fn filter_segments(
    State(state): State<AppState>,
    session: Session,
    Path(segments): Path<String>,
) -> Result<Response, ApiError> {
    let segments: Vec<&str> = segments.split('/').collect();
    render_filter_page(&state, &session, Some(&segments)).await
}

async fn render_filter_page(
    state: &AppState,
    session: &Session,
    segments: Option<&[&str]>,
) -> Result<Response, ApiError> {
    let filter = TagFilter::from_segments(segments);
    let meta = PageMetadata::for_filter_segment(segments.and_then(|s| s.first().copied()));

    let query = NotesQuery::first_page(filter.as_tag());
    let key = QueryKey::notes(query.clone());
    debug!(query_key = %key, filter = ?filter, "Rendering filter page");

    let request_cache = QueryClient::new(state.config.stale_time());
    let api = state.api.clone();
    request_cache
        .prefetch_query(key.clone(), || async move { api.fetch_notes(&query).await })
        .await?;

    let page: NotesPage = request_cache
        .get_query_data(&key)
        .await
        .ok_or_else(|| ApiError::Internal("Prefetched notes missing from cache".to_string()))?;
    let dehydrated = request_cache.dehydrate().await;

    let html = state.templates.filter_page(&meta, filter, &page, &dehydrated)?;
    session.query_client().hydrate(dehydrated).await;

    Ok(session.respond(Html(html)))
}
