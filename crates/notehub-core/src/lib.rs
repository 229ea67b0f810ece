//! # notehub-core
//!
//! Core types, traits, and abstractions for NoteHub.
//!
//! This crate provides the data model shared by the API client, the query
//! cache and the web server: notes and tags, the route tag mapper, query keys,
//! the note validation schema, the draft store and page metadata.

pub mod defaults;
pub mod draft;
pub mod error;
pub mod metadata;
pub mod models;
pub mod query_key;
pub mod tag_filter;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use draft::{DraftPatch, DraftStore, NoteDraft};
pub use error::{Error, Result};
pub use metadata::PageMetadata;
pub use models::*;
pub use query_key::{QueryKey, QueryScope};
pub use tag_filter::TagFilter;
pub use traits::*;
pub use validation::{FieldErrors, FormField, NoteFormValues, NoteSchema};
