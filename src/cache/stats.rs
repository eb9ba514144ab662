//! Cache Statistics Module
//!
//! Hit/miss counters plus the derived snapshot reported by `CacheStore::stats`.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Counters ==
/// Running counters kept by the store. Never reset by `clear`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Cache Stats ==
/// Point-in-time snapshot of cache effectiveness.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Live entries currently held
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// hits / (hits + misses), 0 when there were no lookups
    pub hit_rate: f64,
    pub total_hits: u64,
    pub total_misses: u64,
    /// Entries dropped by the LRU policy
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Creation time of the oldest live entry
    pub oldest_item: Option<DateTime<Utc>>,
    /// Creation time of the newest live entry
    pub newest_item: Option<DateTime<Utc>>,
}

impl CacheStats {
    pub(crate) fn from_counters(
        counters: Counters,
        size: usize,
        max_size: usize,
        oldest_item: Option<DateTime<Utc>>,
        newest_item: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            size,
            max_size,
            hit_rate: hit_rate(counters.hits, counters.misses),
            total_hits: counters.hits,
            total_misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
            oldest_item,
            newest_item,
        }
    }
}

// == Hit Rate ==
/// Returns hits / (hits + misses), or 0.0 if no requests have been made.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
