//! # notehub-query
//!
//! In-memory query cache for NoteHub.
//!
//! A [`QueryClient`] maps [`notehub_core::QueryKey`]s to cached results. The
//! server creates one per request, prefetches into it and ships its
//! [`DehydratedState`] inside the rendered page; a long-lived client cache
//! hydrates that state so its first read of the same key makes no network call.
//! After a write, [`QueryClient::invalidate_queries`] marks a whole scope stale
//! so the next read refetches.

pub mod client;
pub mod hydration;

pub use client::{QueryClient, QueryState, QueryStatus};
pub use hydration::{DehydratedQuery, DehydratedQueryState, DehydratedState};
