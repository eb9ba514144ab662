//! Cache Entry Module
//!
//! Defines individual cache entries with TTL metadata.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

// == Cache Entry ==
/// A single keyed value plus the bookkeeping the store needs for expiry,
/// recency and statistics.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic insert/refresh time, drives expiry
    pub created_at: Instant,
    /// Wall-clock insert/refresh time, reported in statistics
    pub created_wall: DateTime<Utc>,
    /// Time-to-live, None = never expires
    pub ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            created_wall: Utc::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once strictly more than `ttl` has elapsed since
    /// it was created. Entries without a TTL never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.created_at) > ttl,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining lifetime, or None if the entry has no TTL.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl.map(|ttl| {
            let elapsed = Instant::now().saturating_duration_since(self.created_at);
            ttl.saturating_sub(elapsed)
        })
    }
}
