use std::sync::Arc;

use notehub_core::NotesApi;

use crate::config::WebConfig;
use crate::render::Templates;
use crate::session::SessionStore;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn NotesApi>,
    pub sessions: SessionStore,
    pub config: Arc<WebConfig>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(api: Arc<dyn NotesApi>, config: WebConfig) -> anyhow::Result<Self> {
        let templates = Templates::new()?;
        Ok(Self {
            api,
            sessions: SessionStore::new(
                config.session_capacity,
                config.stale_time(),
                config.query_cache_capacity,
            ),
            config: Arc::new(config),
            templates: Arc::new(templates),
        })
    }
}
