//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration. All operations are synchronous and take a short internal lock,
//! so a single `Arc<CacheStore<V>>` can be shared across tasks and threads.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::cache::pattern::glob_match;
use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == TTL Status ==
/// Result of a remaining-lifetime query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// No live entry under this key (never set, deleted or expired)
    Missing,
    /// Entry exists and never expires
    Persistent,
    /// Entry exists and expires after the given duration
    Expires(Duration),
}

impl TtlStatus {
    /// Integer form with Redis-style sentinels: -2 missing, -1 persistent,
    /// otherwise remaining milliseconds.
    pub fn as_millis(&self) -> i64 {
        match self {
            TtlStatus::Missing => -2,
            TtlStatus::Persistent => -1,
            TtlStatus::Expires(remaining) => {
                i64::try_from(remaining.as_millis()).unwrap_or(i64::MAX)
            }
        }
    }
}

#[derive(Debug)]
struct StoreInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    counters: Counters,
}

impl<V> StoreInner<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.lru.remove(key);
        }
        removed
    }

    /// Drops the least recently accessed entry to make room for a new key.
    fn evict_one(&mut self, now: Instant) {
        if let Some(victim) = self.lru.evict_oldest() {
            match self.entries.remove(&victim) {
                Some(entry) if entry.is_expired_at(now) => self.counters.record_expirations(1),
                Some(_) => self.counters.record_eviction(),
                None => {}
            }
        }
    }
}

// == Cache Store ==
/// Capacity-bounded TTL cache with least-recently-used eviction.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Mutex<StoreInner<V>>,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL applied by `set` when the caller gives none
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                counters: Counters::default(),
            }),
            max_size: max_size.max(1),
            default_ttl,
        }
    }

    /// Creates a store sized and timed from the configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_size, config.default_ttl)
    }

    // == Set ==
    /// Stores a value under the store's default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value, Some(self.default_ttl));
    }

    /// Stores a value with an explicit TTL.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.insert(key.into(), value, Some(ttl));
    }

    /// Stores a value that never expires. It can still be evicted or deleted.
    pub fn set_persistent(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value, None);
    }

    /// Inserts or overwrites an entry. Overwriting resets the expiry window
    /// and the per-entry access count. A new key arriving at capacity evicts
    /// the least recently accessed entry first.
    fn insert(&self, key: String, value: V, ttl: Option<Duration>) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_size {
            inner.evict_one(Instant::now());
        }

        inner.lru.touch(&key);
        inner.entries.insert(key, CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// Counts a hit or a miss. A hit refreshes the entry's recency; an
    /// expired entry is removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                inner.counters.record_miss();
                return None;
            }
        };

        if expired {
            inner.remove(key);
            inner.counters.record_expirations(1);
            inner.counters.record_miss();
            return None;
        }

        let value = inner.entries.get(key)?.value.clone();
        inner.lru.touch(key);
        inner.counters.record_hit();
        Some(value)
    }

    // == Peek ==
    /// Returns the value if live, without touching statistics or recency.
    pub fn peek(&self, key: &str) -> Option<V> {
        let guard = self.inner.lock();
        guard
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Existence probe with the same expiry rule as `get`, but no side effects.
    pub fn has(&self, key: &str) -> bool {
        let guard = self.inner.lock();
        guard
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry. Returns whether something was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Hit/miss totals are kept.
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        guard.entries.clear();
        guard.lru.clear();
    }

    // == TTL ==
    /// Remaining lifetime of a key.
    pub fn ttl(&self, key: &str) -> TtlStatus {
        let guard = self.inner.lock();
        match guard.entries.get(key) {
            None => TtlStatus::Missing,
            Some(entry) if entry.is_expired() => TtlStatus::Missing,
            Some(entry) => match entry.ttl_remaining() {
                Some(remaining) => TtlStatus::Expires(remaining),
                None => TtlStatus::Persistent,
            },
        }
    }

    // == Keys ==
    /// Live keys matching a glob pattern, sorted. Expired entries are
    /// skipped but not removed.
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let guard = self.inner.lock();
        let now = Instant::now();
        let mut keys: Vec<String> = guard
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    // == Stats ==
    /// Snapshot of counters and live-set bounds.
    pub fn stats(&self) -> CacheStats {
        let guard = self.inner.lock();
        let now = Instant::now();

        let created: Vec<_> = guard
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.created_wall)
            .collect();

        CacheStats::from_counters(
            guard.counters,
            created.len(),
            self.max_size,
            created.iter().min().copied(),
            created.iter().max().copied(),
        )
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.remove(key);
        }
        inner.counters.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    /// Number of physically stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
