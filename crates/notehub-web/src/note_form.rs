//! The create-note form.
//!
//! Two modes share one state machine, `Idle -> Submitting -> Success` or
//! `Idle -> Submitting -> Failure -> Idle`:
//!
//! - [`FormMode::Validated`] checks every change against [`NoteSchema`] and
//!   refuses to submit while any field is invalid. A successful create
//!   invalidates the session's cached note lists.
//! - [`FormMode::Draft`] mirrors every change into the session draft and
//!   submits the draft exactly as it is. A successful create clears and closes
//!   the draft.
//!
//! Failures are logged here and nowhere else; the caller only learns that the
//! form is back to idle with its input intact.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, error, info};

use notehub_core::{
    CreateNoteRequest, DraftPatch, FieldErrors, FormField, Note, NoteDraft, NoteFormValues,
    NoteSchema, NoteTag, NotesApi, QueryScope,
};

use crate::config::FormMode;
use crate::session::ClientSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Failure,
}

/// Result of [`NoteForm::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The note was created.
    Created(Note),
    /// Validation failed; nothing was sent.
    Rejected,
    /// The create call failed; the form is idle again.
    Failed,
    /// Another submission from the same session is still running.
    InFlight,
}

#[derive(Debug, Clone)]
pub struct NoteForm {
    mode: FormMode,
    values: NoteFormValues,
    touched: BTreeSet<FormField>,
    errors: FieldErrors,
    status: FormStatus,
}

impl NoteForm {
    /// An empty validated form.
    pub fn validated() -> Self {
        Self::with_values(FormMode::Validated, NoteFormValues::default())
    }

    /// A draft form prefilled from the session draft.
    pub fn from_draft(draft: &NoteDraft) -> Self {
        Self::with_values(
            FormMode::Draft,
            NoteFormValues {
                title: draft.title.clone(),
                content: draft.content.clone(),
                tag: draft.tag.to_string(),
            },
        )
    }

    pub fn with_values(mode: FormMode, values: NoteFormValues) -> Self {
        Self {
            mode,
            values,
            touched: BTreeSet::new(),
            errors: FieldErrors::default(),
            status: FormStatus::Idle,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn values(&self) -> &NoteFormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    /// Set one field. Validated forms re-check it.
    pub fn change(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.values.title = value,
            FormField::Content => self.values.content = value,
            FormField::Tag => self.values.tag = value,
        }
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Mark a field as visited. Validated forms re-check it.
    pub fn blur(&mut self, field: FormField) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        if self.status == FormStatus::Submitting {
            return false;
        }
        match self.mode {
            FormMode::Validated => self.errors.is_empty(),
            FormMode::Draft => true,
        }
    }

    /// The draft patch equivalent to the current values. An unknown tag
    /// leaves the draft's tag untouched.
    pub fn draft_patch(&self) -> DraftPatch {
        DraftPatch {
            title: Some(self.values.title.clone()),
            content: Some(self.values.content.clone()),
            tag: self.values.tag.parse::<NoteTag>().ok(),
        }
    }

    /// Submit the form on behalf of `session`.
    pub async fn submit(&mut self, api: &dyn NotesApi, session: &ClientSession) -> SubmitOutcome {
        let request = match self.mode {
            FormMode::Validated => {
                self.touched.extend(FormField::ALL);
                match NoteSchema::validate(&self.values) {
                    Ok(request) => {
                        self.errors = FieldErrors::default();
                        request
                    }
                    Err(errors) => {
                        self.errors = errors;
                        return SubmitOutcome::Rejected;
                    }
                }
            }
            FormMode::Draft => match session.update_draft(self.draft_patch()).await {
                Ok(draft) => draft.to_create_request(),
                Err(_) => return SubmitOutcome::Rejected,
            },
        };

        let Some(_guard) = session.begin_submit() else {
            return SubmitOutcome::InFlight;
        };
        self.status = FormStatus::Submitting;

        match api.create_note(&request).await {
            Ok(note) => {
                self.status = FormStatus::Success;
                self.on_success(session, &request).await;
                info!(note_id = %note.id, tag = %note.tag, mode = %self.mode, "Note created");
                SubmitOutcome::Created(note)
            }
            Err(e) => {
                self.status = FormStatus::Failure;
                error!(error = %e, mode = %self.mode, "Failed to create note");
                self.status = FormStatus::Idle;
                SubmitOutcome::Failed
            }
        }
    }

    async fn on_success(&self, session: &ClientSession, request: &CreateNoteRequest) {
        match self.mode {
            FormMode::Validated => {
                let marked = session.query_client().invalidate_queries(QueryScope::Notes).await;
                debug!(marked, title = %request.title, "Invalidated cached notes");
            }
            FormMode::Draft => {
                session.clear_draft().await;
                session.close_draft().await;
            }
        }
    }

    fn revalidate(&mut self, field: FormField) {
        if self.mode != FormMode::Validated {
            return;
        }
        match NoteSchema::validate_field(field, &self.values) {
            Some(message) => self.errors.insert(field, message),
            None => self.errors.remove(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_client::mock::{MockCall, MockNotesApi};
    use notehub_core::{NotesPage, NotesQuery, QueryKey};
    use std::time::Duration;
    use uuid::Uuid;

    fn session() -> ClientSession {
        ClientSession::new(Uuid::now_v7(), Duration::from_secs(60), 16)
    }

    fn filled(title: &str, tag: &str) -> NoteForm {
        let mut form = NoteForm::validated();
        form.change(FormField::Title, title);
        form.change(FormField::Content, "body");
        form.change(FormField::Tag, tag);
        form
    }

    #[tokio::test]
    async fn test_short_title_is_rejected_without_network() {
        let api = MockNotesApi::new();
        let session = session();
        let mut form = filled("ab", "Work");

        assert!(!form.can_submit());
        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Rejected));
        assert_eq!(
            form.errors().get(FormField::Title),
            Some("The title must be at least 3 characters long.")
        );
        assert_eq!(api.create_count(), 0);
        assert_eq!(form.status(), FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_three_char_title_is_created() {
        let api = MockNotesApi::new();
        let session = session();
        let mut form = filled("abc", "Work");

        assert!(form.can_submit());
        let outcome = form.submit(&api, &session).await;
        assert!(matches!(outcome, SubmitOutcome::Created(ref n) if n.title == "abc"));
        assert_eq!(form.status(), FormStatus::Success);
        assert_eq!(api.create_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tag_is_rejected() {
        let api = MockNotesApi::new();
        let session = session();
        let mut form = filled("Valid title", "Invalid");

        assert_eq!(form.errors().get(FormField::Tag), Some("Invalid tag"));
        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Rejected));
        assert_eq!(api.create_count(), 0);
    }

    #[tokio::test]
    async fn test_untouched_empty_form_reports_every_error_on_submit() {
        let api = MockNotesApi::new();
        let session = session();
        let mut form = NoteForm::validated();
        form.change(FormField::Tag, "");

        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Rejected));
        assert_eq!(form.errors().get(FormField::Title), Some("Title is a required field"));
        assert_eq!(form.errors().get(FormField::Tag), Some("Tag is a required field."));
        assert!(FormField::ALL.iter().all(|f| form.is_touched(*f)));
    }

    #[test]
    fn test_blur_validates_only_that_field() {
        let mut form = NoteForm::validated();
        form.blur(FormField::Title);
        assert!(form.errors().get(FormField::Title).is_some());
        assert!(form.errors().get(FormField::Content).is_none());

        form.change(FormField::Title, "Now valid");
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_validated_success_invalidates_cached_notes() {
        let api = MockNotesApi::new().with_seed_notes(4);
        let session = session();
        let key = QueryKey::notes(NotesQuery::first_page(None));
        session
            .query_client()
            .set_query_data(key.clone(), &NotesPage { notes: vec![], total_pages: 1 })
            .await
            .unwrap();
        assert!(session.query_client().is_fresh(&key).await);

        let mut form = filled("Weekly sync", "Meeting");
        form.submit(&api, &session).await;

        assert!(!session.query_client().is_fresh(&key).await);
    }

    #[tokio::test]
    async fn test_validated_failure_keeps_input_and_returns_to_idle() {
        let api = MockNotesApi::new();
        api.set_fail_create(true);
        let session = session();
        let mut form = filled("Weekly sync", "Meeting");

        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Failed));
        assert_eq!(form.status(), FormStatus::Idle);
        assert_eq!(form.values().title, "Weekly sync");
        assert!(form.can_submit());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submission_refused_while_one_is_in_flight() {
        let api = MockNotesApi::new();
        let session = session();
        let _running = session.begin_submit();

        let mut form = filled("Weekly sync", "Meeting");
        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::InFlight));
        assert_eq!(api.create_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_mode_submits_empty_title() {
        let api = MockNotesApi::new();
        let session = session();
        let draft = session.open_draft().await;
        let mut form = NoteForm::from_draft(&draft);

        assert!(form.can_submit());
        let outcome = form.submit(&api, &session).await;
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(
            api.calls(),
            vec![MockCall::CreateNote(CreateNoteRequest {
                title: String::new(),
                content: String::new(),
                tag: NoteTag::Todo,
            })]
        );
        assert!(session.draft().await.is_none(), "draft must be closed after success");
    }

    #[tokio::test]
    async fn test_draft_mode_mirrors_changes_and_keeps_draft_on_failure() {
        let api = MockNotesApi::new();
        api.set_fail_create(true);
        let session = session();
        let draft = session.open_draft().await;

        let mut form = NoteForm::from_draft(&draft);
        form.change(FormField::Title, "x");
        form.change(FormField::Tag, "Personal");
        assert!(form.errors().is_empty(), "draft mode never validates");

        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Failed));
        let kept = session.draft().await.unwrap();
        assert_eq!(kept.title, "x");
        assert_eq!(kept.tag, NoteTag::Personal);
    }

    #[tokio::test]
    async fn test_draft_mode_without_open_draft_sends_nothing() {
        let api = MockNotesApi::new();
        let session = session();
        let mut form = NoteForm::from_draft(&NoteDraft::default());

        assert!(matches!(form.submit(&api, &session).await, SubmitOutcome::Rejected));
        assert_eq!(api.create_count(), 0);
    }

    #[test]
    fn test_draft_patch_ignores_unknown_tag() {
        let mut form = NoteForm::from_draft(&NoteDraft::default());
        form.change(FormField::Tag, "Bogus");
        assert_eq!(form.draft_patch().tag, None);
        form.change(FormField::Tag, "Work");
        assert_eq!(form.draft_patch().tag, Some(NoteTag::Work));
    }
}
