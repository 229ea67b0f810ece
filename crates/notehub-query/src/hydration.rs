//! Serializable cache snapshots.
//!
//! Shape on the wire:
//!
//! ```json
//! { "queries": [
//!     { "queryKey": { "notes": { "page": 1, "perPage": 12, "search": "", "tag": "Work" } },
//!       "state": { "data": { "notes": [], "totalPages": 0 },
//!                  "status": "success",
//!                  "dataUpdatedAt": 1736499600000 } } ] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use notehub_core::QueryKey;

use crate::client::QueryStatus;

/// Snapshot of every successful entry of a [`crate::QueryClient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DehydratedState {
    pub queries: Vec<DehydratedQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DehydratedQuery {
    pub query_key: QueryKey,
    pub state: DehydratedQueryState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DehydratedQueryState {
    pub data: Value,
    pub status: QueryStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub data_updated_at: DateTime<Utc>,
}

impl DehydratedState {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Find the snapshot of one key.
    pub fn get(&self, key: &QueryKey) -> Option<&DehydratedQueryState> {
        self.queries
            .iter()
            .find(|q| &q.query_key == key)
            .map(|q| &q.state)
    }
}
