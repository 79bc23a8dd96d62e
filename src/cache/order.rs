//! Set-Order Tracker Module
//!
//! Tracks the order in which keys were last written, for capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == Set Order ==
/// Orders keys by their most recent `set`.
///
/// Reads never change a key's position. Each write stamps the key with a
/// fresh sequence number, so the oldest write is the smallest stamp.
#[derive(Debug, Default)]
pub struct SetOrder {
    /// Next sequence number to hand out
    next_seq: u64,
    /// Sequence number -> key, oldest first
    by_seq: BTreeMap<u64, String>,
    /// Key -> its current sequence number
    by_key: HashMap<String, u64>,
}

impl SetOrder {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks `key` as the most recently set.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_seq.insert(seq, key.to_string());
        self.by_key.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Stops tracking `key`. No-op if it was never tracked.
    pub fn remove(&mut self, key: &str) {
        if let Some(seq) = self.by_key.remove(key) {
            self.by_seq.remove(&seq);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently set key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_seq.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    // == Len ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
