//! Core traits for NoteHub abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateNoteRequest, Note, NotesPage, NotesQuery};

/// Remote notes API.
///
/// Implementations report transport and server failures unchanged; callers
/// decide whether to retry. Both operations are attempted once.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Read one page of notes, optionally filtered by tag and search text.
    async fn fetch_notes(&self, query: &NotesQuery) -> Result<NotesPage>;

    /// Create a note and return it as stored.
    async fn create_note(&self, note: &CreateNoteRequest) -> Result<Note>;
}
