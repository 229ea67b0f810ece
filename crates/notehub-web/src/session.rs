//! Client sessions.
//!
//! A client session is the server-side state of one browser: a long-lived
//! [`QueryClient`] that pages hydrate into and JSON reads go through, plus the
//! slot for an in-progress draft. Sessions are identified by the
//! `notehub_session` cookie and kept in a bounded LRU; an evicted or unknown
//! id simply starts a new session.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use notehub_core::{defaults, DraftPatch, DraftStore, Error, NoteDraft, Result};
use notehub_query::QueryClient;

use crate::state::AppState;

/// Server-side state of one browser.
pub struct ClientSession {
    id: Uuid,
    query_client: QueryClient,
    draft: Mutex<Option<DraftStore>>,
    submitting: AtomicBool,
}

impl ClientSession {
    pub fn new(id: Uuid, stale_time: Duration, query_cache_capacity: usize) -> Self {
        Self {
            id,
            query_client: QueryClient::with_capacity(stale_time, query_cache_capacity),
            draft: Mutex::new(None),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query_client(&self) -> &QueryClient {
        &self.query_client
    }

    /// Open the draft slot if needed and return the current draft.
    pub async fn open_draft(&self) -> NoteDraft {
        let mut slot = self.draft.lock().await;
        slot.get_or_insert_with(|| {
            debug!(session_id = %self.id, "Draft opened");
            DraftStore::new()
        })
        .get()
        .clone()
    }

    /// The current draft, or `None` when no draft is open.
    pub async fn draft(&self) -> Option<NoteDraft> {
        self.draft.lock().await.as_ref().map(|s| s.get().clone())
    }

    /// Merge fields into the open draft.
    pub async fn update_draft(&self, patch: DraftPatch) -> Result<NoteDraft> {
        let mut slot = self.draft.lock().await;
        let store = slot
            .as_mut()
            .ok_or_else(|| Error::InvalidInput("No draft is open".to_string()))?;
        store.set(patch);
        Ok(store.get().clone())
    }

    /// Reset the open draft to empty. No-op when closed.
    pub async fn clear_draft(&self) {
        if let Some(store) = self.draft.lock().await.as_mut() {
            store.clear();
        }
    }

    /// Drop the draft slot.
    pub async fn close_draft(&self) {
        if self.draft.lock().await.take().is_some() {
            debug!(session_id = %self.id, "Draft closed");
        }
    }

    /// Mark a submission as in flight. Returns `None` if one already is.
    pub fn begin_submit(&self) -> Option<SubmitGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { session: self })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when dropped.
pub struct SubmitGuard<'a> {
    session: &'a ClientSession,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.session.submitting.store(false, Ordering::Release);
    }
}

/// Bounded store of client sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<LruCache<Uuid, Arc<ClientSession>>>>,
    stale_time: Duration,
    query_cache_capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize, stale_time: Duration, query_cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Arc::new(Mutex::new(LruCache::new(capacity))),
            stale_time,
            query_cache_capacity,
        }
    }

    /// Look up a session by id, creating a fresh one when absent.
    /// The flag is true when the session was created by this call.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Arc<ClientSession>, bool) {
        let mut sessions = self.sessions.lock().await;
        if let Some(id) = id {
            if let Some(session) = sessions.get(&id) {
                return (session.clone(), false);
            }
        }

        let id = Uuid::now_v7();
        let session = Arc::new(ClientSession::new(
            id,
            self.stale_time,
            self.query_cache_capacity,
        ));
        if let Some((evicted, _)) = sessions.push(id, session.clone()) {
            if evicted != id {
                debug!(session_id = %evicted, "Session evicted");
            }
        }
        debug!(session_id = %id, "Session created");
        (session, true)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Read the session id from a `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == defaults::SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        defaults::SESSION_COOKIE,
        id
    )
}

/// Extractor resolving the request's client session.
pub struct Session {
    pub session: Arc<ClientSession>,
    is_new: bool,
}

impl Session {
    /// Attach the session cookie to a response when the session is new.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(self.session.id())) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

impl std::ops::Deref for Session {
    type Target = ClientSession;

    fn deref(&self) -> &ClientSession {
        &self.session
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let id = session_id_from_headers(&parts.headers);
        let (session, is_new) = app.sessions.get_or_create(id).await;
        Ok(Session { session, is_new })
    }
}
