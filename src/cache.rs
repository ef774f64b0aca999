use crate::error::AppError;
use crate::table::{AggregationMode, EntityKind, StatsTable};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Identifies one fetched dataset. `epoch` lets callers invalidate every
/// entry at once without touching the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub mode: AggregationMode,
    pub epoch: u64,
}

impl CacheKey {
    pub fn new(kind: EntityKind, mode: AggregationMode, epoch: u64) -> Self {
        CacheKey { kind, mode, epoch }
    }
}

#[derive(Debug, Clone)]
struct CachedTable {
    table: Arc<StatsTable>,
    fetched_at: DateTime<Utc>,
}

impl CachedTable {
    fn is_stale(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match ttl {
            Some(ttl) => now.signed_duration_since(self.fetched_at) >= ttl,
            None => false,
        }
    }
}

/// Memoizes statistics tables for the lifetime of a session.
///
/// Not shared between threads; each session owns its own instance.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, CachedTable>,
    epoch: u64,
    ttl: Option<Duration>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `ttl` are refetched on next access.
    pub fn with_ttl(ttl: Duration) -> Self {
        DatasetCache {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn key(&self, kind: EntityKind, mode: AggregationMode) -> CacheKey {
        CacheKey::new(kind, mode, self.epoch)
    }

    /// Returns the cached table for `key`, or runs `fetch` and stores its
    /// result. Errors are returned as-is and nothing is stored.
    pub fn get_or_fetch<F>(&mut self, key: CacheKey, fetch: F) -> Result<Arc<StatsTable>, AppError>
    where
        F: FnOnce() -> Result<StatsTable, AppError>,
    {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_stale(self.ttl, now) {
                debug!(kind = %key.kind, mode = %key.mode, epoch = key.epoch, "dataset cache hit");
                return Ok(Arc::clone(&entry.table));
            }
            debug!(kind = %key.kind, mode = %key.mode, "dataset cache entry expired");
        }

        debug!(kind = %key.kind, mode = %key.mode, epoch = key.epoch, "dataset cache miss");
        let table = Arc::new(fetch()?);
        self.entries.insert(
            key,
            CachedTable {
                table: Arc::clone(&table),
                fetched_at: Utc::now(),
            },
        );
        Ok(table)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Moves to a fresh epoch and drops everything cached under older ones.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        let current = self.epoch;
        self.entries.retain(|key, _| key.epoch == current);
        current
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
