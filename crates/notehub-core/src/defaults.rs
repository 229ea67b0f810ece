//! Centralized default constants for NoteHub.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// NOTES
// =============================================================================

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 3;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 500;

// =============================================================================
// PAGINATION
// =============================================================================

/// First page number (the NoteHub API is 1-based).
pub const FIRST_PAGE: u32 = 1;

/// Notes per page on the filter page.
pub const NOTES_PER_PAGE: u32 = 12;

// =============================================================================
// ROUTING / PAGES
// =============================================================================

/// Route segment meaning "no tag filter".
pub const ALL_SEGMENT: &str = "All";

/// Site name used in page titles.
pub const SITE_NAME: &str = "NoteHub";

// =============================================================================
// QUERY CACHE
// =============================================================================

/// Seconds a cached query result stays fresh.
pub const QUERY_STALE_SECS: u64 = 60;

/// Maximum number of entries in one query cache.
pub const QUERY_CACHE_CAPACITY: usize = 256;

// =============================================================================
// NOTEHUB API
// =============================================================================

/// Default NoteHub API base URL.
pub const NOTEHUB_API_URL: &str = "https://notehub-public.goit.study/api";

/// HTTP request timeout for the NoteHub API in seconds.
pub const NOTEHUB_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Maximum number of live client sessions kept in memory.
pub const SESSION_CAPACITY: usize = 1024;

/// Name of the client session cookie.
pub const SESSION_COOKIE: &str = "notehub_session";

/// Maximum request body size in bytes (form posts only).
pub const MAX_BODY_SIZE_BYTES: usize = 64 * 1024;
