//! Shared Cache Handle
//!
//! Thread-safe, cloneable handle over a [`CacheStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;

// == Expiring Cache ==
/// Process-wide cache shared by request handlers.
///
/// Every operation runs under a single lock acquisition, so the
/// check-expiry-then-remove path of `get` cannot interleave with a
/// concurrent `set`. Nothing here awaits; the lock is never held across
/// a suspension point.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> ExpiringCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_entries`.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self::from_store(CacheStore::new(max_entries, default_ttl))
    }

    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // A panic while holding the lock cannot leave a half-written entry
    // (inserts are single HashMap operations), so the poisoned store is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, CacheStore<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`. See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        self.lock().set(key, value, ttl)
    }

    /// Stores `value` with the default TTL.
    pub fn set_default(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.lock().set_default(key, value)
    }

    // == Get ==
    /// Returns the live value for `key`, removing it if it has expired.
    pub fn get(&self, key: impl AsRef<str>) -> Result<Option<V>> {
        self.lock().get(key.as_ref())
    }

    /// Returns the live value for `key` without counting a hit or miss.
    pub fn peek(&self, key: impl AsRef<str>) -> Option<V> {
        self.lock().peek(key.as_ref())
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&self, key: impl AsRef<str>) -> Result<bool> {
        self.lock().delete(key.as_ref())
    }

    // == Cleanup Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        self.lock().cleanup_expired()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// TTL applied by [`ExpiringCache::set_default`].
    pub fn default_ttl(&self) -> Duration {
        self.lock().default_ttl()
    }
}
