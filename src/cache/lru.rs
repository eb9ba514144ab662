//! LRU Tracker Module
//!
//! Orders keys by most recent access so the store can evict the entry whose
//! last read is oldest.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access recency for LRU eviction.
///
/// Every touch stamps the key with a strictly increasing sequence number, so
/// two accesses within the same clock tick still have a defined order.
/// - Lowest sequence = least recently used
/// - Highest sequence = most recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Sequence number -> key, ordered oldest first
    order: BTreeMap<u64, String>,
    /// Key -> its current sequence number
    positions: HashMap<String, u64>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as the most recently used one.
    pub fn touch(&mut self, key: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;

        match self.positions.get_mut(key) {
            Some(pos) => {
                self.order.remove(pos);
                *pos = seq;
            }
            None => {
                self.positions.insert(key.to_string(), seq);
            }
        }
        self.order.insert(seq, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(seq) = self.positions.remove(key) {
            self.order.remove(&seq);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.positions.remove(&key);
        Some(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.positions.clear();
    }
}
