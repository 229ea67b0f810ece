//! # notehub-web
//!
//! HTTP server for NoteHub.
//!
//! Routes:
//! - `GET /notes/filter[/{tag}]`: server-rendered notes list with the query
//!   cache snapshot embedded for hydration
//! - `GET|POST /notes/action/create`: the create-note form
//! - `POST /notes/action/create/draft`, `POST /notes/action/create/discard`:
//!   draft updates (draft form mode only)
//! - `GET /api/notes`: notes JSON read through the session cache
//! - `GET /health`

pub mod config;
pub mod error;
pub mod handlers;
pub mod note_form;
pub mod render;
pub mod request_id;
pub mod session;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use notehub_core::defaults;

pub use config::{FormMode, WebConfig};
pub use error::ApiError;
pub use state::AppState;

use handlers::{filter, form, health, notes};
use request_id::MakeRequestUuidV7;

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/notes/filter", get(filter::filter_all))
        .route("/notes/filter/*segments", get(filter::filter_segments))
        .route(
            "/notes/action/create",
            get(form::show_form).post(form::submit_form),
        )
        .route("/api/notes", get(notes::list_notes));

    if state.config.form_mode == FormMode::Draft {
        router = router
            .route("/notes/action/create/draft", post(form::update_draft))
            .route("/notes/action/create/discard", post(form::discard_draft));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_SIZE_BYTES))
        .with_state(state)
}
