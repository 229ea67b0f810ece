//! HTTP handlers.

pub mod filter;
pub mod form;
pub mod health;
pub mod notes;
