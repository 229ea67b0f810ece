//! In-memory NoteHub API for deterministic testing.
//!
//! Records every call so tests can assert on network traffic (how many
//! fetches a cache issued, what a form submitted) and can be switched into a
//! failing mode at any point.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notehub_client::mock::MockNotesApi;
//! use notehub_core::{NotesApi, NotesQuery};
//!
//! #[tokio::test]
//! async fn test_with_mock_api() {
//!     let api = MockNotesApi::new().with_seed_notes(3);
//!     let page = api.fetch_notes(&NotesQuery::default()).await.unwrap();
//!     assert_eq!(page.notes.len(), 3);
//!     assert_eq!(api.fetch_count(), 1);
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use notehub_core::{
    CreateNoteRequest, Error, Note, NoteTag, NotesApi, NotesPage, NotesQuery, Result,
};

/// A recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FetchNotes(NotesQuery),
    CreateNote(CreateNoteRequest),
}

/// In-memory notes API.
#[derive(Clone, Default)]
pub struct MockNotesApi {
    notes: Arc<Mutex<Vec<Note>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    fail_fetch: Arc<AtomicBool>,
    fail_create: Arc<AtomicBool>,
    latency_ms: u64,
}

impl MockNotesApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `count` notes, cycling through every tag.
    pub fn with_seed_notes(self, count: usize) -> Self {
        {
            let mut notes = self.notes.lock().unwrap();
            for i in 0..count {
                let tag = NoteTag::ALL[i % NoteTag::ALL.len()];
                let index = notes.len();
                notes.push(Self::make_note(
                    index,
                    CreateNoteRequest {
                        title: format!("Note {}", i + 1),
                        content: format!("Content of note {}", i + 1),
                        tag,
                    },
                ));
            }
        }
        self
    }

    /// Delay every call by the given number of milliseconds.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Make subsequent fetches fail with a 500.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent creates fail with a 500.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded fetch queries in order.
    pub fn fetch_queries(&self) -> Vec<NotesQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::FetchNotes(q) => Some(q),
                MockCall::CreateNote(_) => None,
            })
            .collect()
    }

    /// Recorded create payloads in order.
    pub fn created(&self) -> Vec<CreateNoteRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::CreateNote(n) => Some(n),
                MockCall::FetchNotes(_) => None,
            })
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_queries().len()
    }

    pub fn create_count(&self) -> usize {
        self.created().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn make_note(index: usize, req: CreateNoteRequest) -> Note {
        let now = Utc::now();
        Note {
            id: format!("note-{}", index + 1),
            title: req.title,
            content: req.content,
            tag: req.tag,
            created_at: now,
            updated_at: now,
        }
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }

    fn simulated_failure() -> Error {
        Error::Upstream {
            status: 500,
            message: "Simulated failure".to_string(),
        }
    }
}

#[async_trait]
impl NotesApi for MockNotesApi {
    async fn fetch_notes(&self, query: &NotesQuery) -> Result<NotesPage> {
        self.calls
            .lock()
            .unwrap()
            .push(MockCall::FetchNotes(query.clone()));
        self.simulate_latency().await;

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::simulated_failure());
        }

        let search = query.search.to_lowercase();
        let matching: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| query.tag.map_or(true, |t| n.tag == t))
            .filter(|n| {
                search.is_empty()
                    || n.title.to_lowercase().contains(&search)
                    || n.content.to_lowercase().contains(&search)
            })
            .cloned()
            .collect();

        let per_page = query.per_page.max(1) as usize;
        let total_pages = matching.len().div_ceil(per_page) as u32;
        let skip = (query.page.max(1) as usize - 1) * per_page;
        let notes = matching.into_iter().skip(skip).take(per_page).collect();

        Ok(NotesPage { notes, total_pages })
    }

    async fn create_note(&self, note: &CreateNoteRequest) -> Result<Note> {
        self.calls
            .lock()
            .unwrap()
            .push(MockCall::CreateNote(note.clone()));
        self.simulate_latency().await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::simulated_failure());
        }

        let mut notes = self.notes.lock().unwrap();
        let created = Self::make_note(notes.len(), note.clone());
        notes.push(created.clone());
        Ok(created)
    }
}
