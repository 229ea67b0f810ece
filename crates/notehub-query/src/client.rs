//! The query cache.
//!
//! Entries store JSON values, so one cache can hold any serializable result
//! type and its contents can be dehydrated without knowing those types.
//!
//! ## Freshness
//!
//! An entry is served without calling the fetcher only while it is
//! successful, not invalidated, and younger than the stale time.
//!
//! ## Bounded size
//!
//! Entries live in an LRU of fixed capacity. Reads refresh recency; the least
//! recently used entry is dropped when a new key would exceed the capacity.
//!
//! ## Concurrent reads
//!
//! Reads of one key that miss at the same time share a single fetch: each key
//! has an in-flight slot, and callers that queue on it re-check the cache
//! before fetching themselves.
//!
//! ## Invalidation during a fetch
//!
//! Each scope carries an invalidation epoch. A fetch remembers the epoch it
//! started under; if the scope was invalidated before the fetch completed, the
//! result is stored but stays marked invalidated, so the invalidation is not
//! lost to an older response.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use notehub_core::{defaults, QueryKey, QueryScope, Result};

use crate::hydration::{DehydratedQuery, DehydratedQueryState, DehydratedState};

/// Outcome of the last fetch of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Success,
    Error,
}

/// Inspection snapshot of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub data: Option<Value>,
    pub status: QueryStatus,
    pub data_updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub invalidated: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Option<Value>,
    status: QueryStatus,
    data_updated_at: Option<DateTime<Utc>>,
    error: Option<String>,
    invalidated: bool,
}

impl CacheEntry {
    fn success(data: Value, data_updated_at: DateTime<Utc>, invalidated: bool) -> Self {
        Self {
            data: Some(data),
            status: QueryStatus::Success,
            data_updated_at: Some(data_updated_at),
            error: None,
            invalidated,
        }
    }

    fn is_fresh(&self, stale_time: chrono::Duration, now: DateTime<Utc>) -> bool {
        if self.status != QueryStatus::Success || self.invalidated {
            return false;
        }
        match self.data_updated_at {
            Some(at) => now - at < stale_time,
            None => false,
        }
    }

    fn snapshot(&self) -> QueryState {
        QueryState {
            data: self.data.clone(),
            status: self.status,
            data_updated_at: self.data_updated_at,
            error: self.error.clone(),
            invalidated: self.invalidated,
        }
    }
}

struct CacheState {
    entries: LruCache<QueryKey, CacheEntry>,
    epochs: HashMap<QueryScope, u64>,
}

impl CacheState {
    fn epoch(&self, scope: QueryScope) -> u64 {
        self.epochs.get(&scope).copied().unwrap_or(0)
    }

    fn insert(&mut self, key: QueryKey, entry: CacheEntry) {
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                debug!(query_key = %evicted, "Cache EVICT");
            }
        }
    }
}

type InFlightSlot = Arc<Mutex<()>>;

/// Query cache handle. Clones share the same cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<QueryClientInner>,
}

struct QueryClientInner {
    state: Mutex<CacheState>,
    in_flight: Mutex<HashMap<QueryKey, InFlightSlot>>,
    stale_time: chrono::Duration,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(defaults::QUERY_STALE_SECS))
    }
}

impl QueryClient {
    /// Create an empty cache whose entries stay fresh for `stale_time`,
    /// holding at most [`defaults::QUERY_CACHE_CAPACITY`] entries.
    pub fn new(stale_time: Duration) -> Self {
        Self::with_capacity(stale_time, defaults::QUERY_CACHE_CAPACITY)
    }

    /// Create an empty cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(stale_time: Duration, capacity: usize) -> Self {
        let stale_time = chrono::Duration::from_std(stale_time)
            .unwrap_or_else(|_| chrono::Duration::seconds(defaults::QUERY_STALE_SECS as i64));
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(QueryClientInner {
                state: Mutex::new(CacheState {
                    entries: LruCache::new(capacity),
                    epochs: HashMap::new(),
                }),
                in_flight: Mutex::new(HashMap::new()),
                stale_time,
            }),
        }
    }

    /// Read through the cache.
    ///
    /// Returns fresh cached data without calling `fetcher`; otherwise runs
    /// the fetch, stores the result and returns it. Fetch errors are recorded
    /// on the entry and returned unchanged. Concurrent misses on one key wait
    /// for the first fetch and are served from its result.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh_data(&key).await {
            debug!(query_key = %key, "Cache HIT");
            return Ok(value);
        }

        let slot = self.in_flight_slot(&key).await;
        let result = {
            let _running = slot.lock().await;
            // an earlier caller may have filled the entry while we queued
            let cached: Option<T> = self.fresh_data(&key).await;
            match cached {
                Some(value) => {
                    debug!(query_key = %key, "Cache HIT after in-flight fetch");
                    Ok(value)
                }
                None => self.run_fetch(key, fetcher).await,
            }
        };
        drop(slot);
        self.release_in_flight().await;
        result
    }

    /// Warm the cache for `key`. Does nothing when a fresh entry exists.
    /// Fetch errors propagate to the caller.
    pub async fn prefetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        debug!(query_key = %key, "Prefetch");
        self.fetch_query(key, fetcher).await.map(|_: T| ())
    }

    /// Cached data for `key`, fresh or not.
    pub async fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut state = self.inner.state.lock().await;
        let data = state.entries.get(key)?.data.clone()?;
        serde_json::from_value(data).ok()
    }

    /// Store data for `key` as a fresh successful result.
    pub async fn set_query_data<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<()> {
        let data = serde_json::to_value(value)?;
        let mut state = self.inner.state.lock().await;
        state.insert(key, CacheEntry::success(data, Utc::now(), false));
        Ok(())
    }

    /// Mark every entry of `scope` stale. Returns how many entries were marked.
    pub async fn invalidate_queries(&self, scope: QueryScope) -> usize {
        let mut state = self.inner.state.lock().await;
        *state.epochs.entry(scope).or_insert(0) += 1;

        let mut marked = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.scope() == scope {
                entry.invalidated = true;
                marked += 1;
            }
        }
        debug!(scope = %scope, entry_count = marked, "Cache INVALIDATE");
        marked
    }

    /// Inspect one entry without touching its recency.
    pub async fn query_state(&self, key: &QueryKey) -> Option<QueryState> {
        let state = self.inner.state.lock().await;
        state.entries.peek(key).map(CacheEntry::snapshot)
    }

    /// Whether a read of `key` right now would be served from the cache.
    pub async fn is_fresh(&self, key: &QueryKey) -> bool {
        let state = self.inner.state.lock().await;
        state
            .entries
            .peek(key)
            .is_some_and(|e| e.is_fresh(self.inner.stale_time, Utc::now()))
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Maximum number of cached entries.
    pub async fn capacity(&self) -> usize {
        self.inner.state.lock().await.entries.cap().get()
    }

    /// Snapshot every successful entry.
    pub async fn dehydrate(&self) -> DehydratedState {
        let state = self.inner.state.lock().await;
        let mut queries: Vec<DehydratedQuery> = state
            .entries
            .iter()
            .filter(|(_, e)| e.status == QueryStatus::Success)
            .filter_map(|(key, e)| {
                let data = e.data.clone()?;
                let data_updated_at = e.data_updated_at?;
                trace!(query_key = %key, "Dehydrate entry");
                Some(DehydratedQuery {
                    query_key: key.clone(),
                    state: DehydratedQueryState {
                        data,
                        status: QueryStatus::Success,
                        data_updated_at,
                    },
                })
            })
            .collect();
        // stable output for identical caches
        queries.sort_by_key(|q| q.query_key.to_string());
        DehydratedState { queries }
    }

    /// Re-materialize a snapshot. An existing entry is replaced only by a
    /// newer snapshot. Returns how many entries were written.
    pub async fn hydrate(&self, dehydrated: DehydratedState) -> usize {
        let mut state = self.inner.state.lock().await;
        let mut written = 0;
        for query in dehydrated.queries {
            if query.state.status != QueryStatus::Success {
                continue;
            }
            let incoming_at = query.state.data_updated_at;
            let newer = match state.entries.peek(&query.query_key) {
                Some(existing) => existing.data_updated_at.map_or(true, |at| incoming_at > at),
                None => true,
            };
            if !newer {
                trace!(query_key = %query.query_key, "Hydrate skipped, cache is newer");
                continue;
            }
            trace!(query_key = %query.query_key, "Hydrate entry");
            state.insert(
                query.query_key,
                CacheEntry::success(query.state.data, incoming_at, false),
            );
            written += 1;
        }
        debug!(entry_count = written, "Cache HYDRATE");
        written
    }

    /// Fresh data for `key`, refreshing its recency.
    async fn fresh_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut state = self.inner.state.lock().await;
        let entry = state.entries.get(key)?;
        if !entry.is_fresh(self.inner.stale_time, Utc::now()) {
            return None;
        }
        match serde_json::from_value::<T>(entry.data.clone()?) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(query_key = %key, error = %e, "Cache entry has unexpected shape, refetching");
                None
            }
        }
    }

    async fn run_fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started_epoch = self.inner.state.lock().await.epoch(key.scope());

        debug!(query_key = %key, "Cache MISS");
        match fetcher().await {
            Ok(value) => {
                let data = serde_json::to_value(&value)?;
                self.store_success(key, data, started_epoch).await;
                Ok(value)
            }
            Err(e) => {
                self.store_error(key, e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn in_flight_slot(&self, key: &QueryKey) -> InFlightSlot {
        let mut in_flight = self.inner.in_flight.lock().await;
        Arc::clone(
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drop slots nobody holds any more.
    async fn release_in_flight(&self) {
        self.inner
            .in_flight
            .lock()
            .await
            .retain(|_, slot| Arc::strong_count(slot) > 1);
    }

    async fn store_success(&self, key: QueryKey, data: Value, started_epoch: u64) {
        let mut state = self.inner.state.lock().await;
        let invalidated = state.epoch(key.scope()) != started_epoch;
        if invalidated {
            debug!(query_key = %key, "Scope invalidated during fetch, result stored as stale");
        }
        state.insert(key, CacheEntry::success(data, Utc::now(), invalidated));
    }

    async fn store_error(&self, key: QueryKey, error: String) {
        let mut state = self.inner.state.lock().await;
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.status = QueryStatus::Error;
            entry.error = Some(error);
            return;
        }
        state.insert(
            key,
            CacheEntry {
                data: None,
                status: QueryStatus::Error,
                data_updated_at: None,
                error: Some(error),
                invalidated: false,
            },
        );
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.inner.in_flight.lock().await.len()
    }
}
