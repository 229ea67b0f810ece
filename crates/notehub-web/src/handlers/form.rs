//! `/notes/action/create` form routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use notehub_core::{DraftPatch, FormField, NoteTag};

use crate::config::FormMode;
use crate::error::ApiError;
use crate::note_form::{NoteForm, SubmitOutcome};
use crate::session::Session;
use crate::state::AppState;

/// Where the form navigates after a create or a discard.
pub const AFTER_SUBMIT_PATH: &str = "/notes/filter/All";

/// Urlencoded form body. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct NoteFormInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag: Option<String>,
}

impl NoteFormInput {
    fn apply(self, form: &mut NoteForm) {
        if let Some(title) = self.title {
            form.change(FormField::Title, title);
        }
        if let Some(content) = self.content {
            form.change(FormField::Content, content);
        }
        if let Some(tag) = self.tag {
            form.change(FormField::Tag, tag);
        }
    }

    fn into_patch(self) -> DraftPatch {
        DraftPatch {
            title: self.title,
            content: self.content,
            tag: self.tag.and_then(|t| t.parse::<NoteTag>().ok()),
        }
    }
}

/// `GET /notes/action/create`
pub async fn show_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ApiError> {
    let form = match state.config.form_mode {
        FormMode::Validated => NoteForm::validated(),
        FormMode::Draft => NoteForm::from_draft(&session.open_draft().await),
    };
    let html = state.templates.note_form(&form)?;
    Ok(session.respond(Html(html)))
}

/// `POST /notes/action/create`
pub async fn submit_form(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<NoteFormInput>,
) -> Result<Response, ApiError> {
    let mut form = match state.config.form_mode {
        FormMode::Validated => NoteForm::validated(),
        FormMode::Draft => match session.draft().await {
            Some(draft) => NoteForm::from_draft(&draft),
            // no open draft: the form is not mounted and renders nothing
            None => return Ok(session.respond(Html(String::new()))),
        },
    };
    input.apply(&mut form);

    let response = match form.submit(state.api.as_ref(), &session).await {
        SubmitOutcome::Created(_) => Redirect::to(AFTER_SUBMIT_PATH).into_response(),
        SubmitOutcome::Rejected => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(state.templates.note_form(&form)?),
        )
            .into_response(),
        // logged by the form; the user sees the same form again with input kept
        SubmitOutcome::Failed => Html(state.templates.note_form(&form)?).into_response(),
        SubmitOutcome::InFlight => (
            StatusCode::CONFLICT,
            Html(state.templates.note_form(&form)?),
        )
            .into_response(),
    };
    Ok(session.respond(response))
}

/// `POST /notes/action/create/draft`
pub async fn update_draft(
    session: Session,
    Form(input): Form<NoteFormInput>,
) -> Result<Response, ApiError> {
    session.update_draft(input.into_patch()).await?;
    Ok(session.respond(StatusCode::NO_CONTENT))
}

/// `POST /notes/action/create/discard`
pub async fn discard_draft(session: Session) -> Response {
    session.clear_draft().await;
    session.close_draft().await;
    session.respond(Redirect::to(AFTER_SUBMIT_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_leave_form_untouched() {
        let mut form = NoteForm::validated();
        NoteFormInput {
            title: Some("Standup".to_string()),
            ..Default::default()
        }
        .apply(&mut form);

        assert_eq!(form.values().title, "Standup");
        assert_eq!(form.values().tag, "Todo");
        assert!(!form.is_touched(FormField::Content));
    }

    #[test]
    fn test_patch_drops_unknown_tag() {
        let patch = NoteFormInput {
            title: Some(String::new()),
            content: None,
            tag: Some("Nope".to_string()),
        }
        .into_patch();
        assert_eq!(patch.title, Some(String::new()));
        assert_eq!(patch.tag, None);
    }
}
