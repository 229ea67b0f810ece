//! # notehub-client
//!
//! HTTP client for the NoteHub notes API.
//!
//! This crate provides:
//! - [`NoteHubClient`], a `reqwest` implementation of [`notehub_core::NotesApi`]
//! - [`NoteHubConfig`], loaded from environment variables
//! - An in-memory recording backend for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use notehub_client::NoteHubClient;
//! use notehub_core::{NotesApi, NotesQuery, NoteTag};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = NoteHubClient::from_env().unwrap();
//!     let page = client
//!         .fetch_notes(&NotesQuery::first_page(Some(NoteTag::Work)))
//!         .await
//!         .unwrap();
//!     println!("{} notes, {} pages", page.notes.len(), page.total_pages);
//! }
//! ```

pub mod backend;
pub mod config;
mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use backend::NoteHubClient;
pub use config::NoteHubConfig;
