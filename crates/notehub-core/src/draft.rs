//! In-progress note drafts.
//!
//! A [`DraftStore`] holds one [`NoteDraft`] while the user composes a note.
//! It performs no validation; whatever it holds is what a draft-mode form
//! submits. Ownership and lifetime belong to the caller (the web layer keeps
//! one per client session, opened when the compose view is shown and dropped
//! on successful submit or discard).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CreateNoteRequest, NoteTag};

/// A partially filled note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NoteDraft {
    /// The create payload for this draft, as-is.
    pub fn to_create_request(&self) -> CreateNoteRequest {
        CreateNoteRequest {
            title: self.title.clone(),
            content: self.content.clone(),
            tag: self.tag,
        }
    }
}

/// Fields to merge into a draft. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag: Option<NoteTag>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tag.is_none()
    }
}

/// Holder of the draft being composed.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    draft: NoteDraft,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &NoteDraft {
        &self.draft
    }

    /// Merge the given fields into the draft.
    pub fn set(&mut self, patch: DraftPatch) {
        if let Some(title) = patch.title {
            self.draft.title = title;
        }
        if let Some(content) = patch.content {
            self.draft.content = content;
        }
        if let Some(tag) = patch.tag {
            self.draft.tag = tag;
        }
        debug!(
            title_len = self.draft.title.len(),
            content_len = self.draft.content.len(),
            tag = %self.draft.tag,
            "Draft updated"
        );
    }

    /// Reset to the empty default draft.
    pub fn clear(&mut self) {
        self.draft = NoteDraft::default();
        debug!("Draft cleared");
    }
}
