//! Cache Store Module
//!
//! Map-backed TTL store with a capacity bound and least-recently-set eviction.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::key::validate_key;
use crate::cache::{CacheEntry, CacheStats, SetOrder};
use crate::error::Result;

// == Cache Store ==
/// Single-threaded cache storage.
///
/// Wrap it in [`crate::cache::ExpiringCache`] to share it between tasks.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Write order for capacity eviction
    order: SetOrder,
    /// Keys ordered by expiry, soonest first. Entries that never expire
    /// are not listed.
    expiry: BTreeSet<(Instant, String)>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied by [`CacheStore::set_default`]
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` (minimum 1).
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: SetOrder::new(),
            expiry: BTreeSet::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// A zero TTL stores an entry that is never readable, and a TTL past
    /// the clock's range stores one that never expires. When the store is
    /// full, expired entries are purged first; if it is still full the
    /// least recently set entry is evicted.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;

        let now = Instant::now();
        let is_overwrite = self.remove_entry(&key).is_some();

        if !is_overwrite && self.entries.len() >= self.max_entries {
            let purged = self.purge_expired(now);
            if purged > 0 {
                debug!(purged, "Purged expired entries to make room");
            }
        }

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.order.evict_oldest() {
                self.remove_entry(&evicted_key);
                self.stats.record_eviction();
                debug!(key = %evicted_key, "Evicted least recently set entry");
            }
        }

        let entry = CacheEntry::new_at(value, ttl, now);
        if let Some(at) = entry.expires_at {
            self.expiry.insert((at, key.clone()));
        }
        self.entries.insert(key.clone(), entry);
        self.order.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    /// Stores `value` with the store's default TTL.
    pub fn set_default(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let ttl = self.default_ttl;
        self.set(key, value, ttl)
    }

    // == Get ==
    /// Returns the live value for `key`, or `None`.
    ///
    /// An expired entry is removed by the read that discovers it, so a
    /// second read after expiry is a plain miss.
    pub fn get(&mut self, key: &str) -> Result<Option<V>> {
        validate_key(key)?;

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        Ok(None)
    }

    // == Peek ==
    /// Returns the live value for `key` without touching statistics or
    /// removing an expired entry.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes any entry for `key`. Returns whether something was removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let removed = self.remove_entry(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
        }
        Ok(removed)
    }

    // == Stats ==
    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.purge_expired(Instant::now())
    }

    /// Walks the expiry index up to `now`, so the cost follows the number
    /// of due entries rather than the store size.
    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .expiry
            .iter()
            .take_while(|(at, _)| *at <= now)
            .filter(|(_, key)| {
                self.entries
                    .get(key)
                    .is_some_and(|entry| entry.is_expired_at(now))
            })
            .map(|(_, key)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        if let Some(at) = entry.expires_at {
            self.expiry.remove(&(at, key.to_string()));
        }
        self.order.remove(key);
        Some(entry)
    }

    // == Len ==
    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// TTL used by [`CacheStore::set_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
