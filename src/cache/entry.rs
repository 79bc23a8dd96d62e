//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored value together with its absolute expiry.
///
/// Time is read from `tokio::time::Instant`, so tests running on a paused
/// runtime can advance the clock deterministically.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant the entry was written
    pub created_at: Instant,
    /// Instant after which the entry is absent. `None` when the TTL reaches
    /// past the clock's range; such an entry never expires.
    pub expires_at: Option<Instant>,
    /// A zero TTL is stored but never readable
    immediate: bool,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::new_at(value, ttl, Instant::now())
    }

    /// Creates an entry as if written at `now`.
    pub fn new_at(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now.checked_add(ttl),
            immediate: ttl.is_zero(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is live while `now <= expires_at`. Entries written with a
    /// zero TTL are expired from the start.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.immediate || self.expires_at.is_some_and(|at| now > at)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert!(!entry.is_expired());
        assert!(entry.expires_at > Some(entry.created_at));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(1u32, Duration::ZERO);

        assert!(entry.is_expired());
        assert_eq!(entry.expires_at, Some(entry.created_at));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new_at("test", Duration::from_millis(1000), now);

        // Still live exactly at expires_at, gone one tick later
        assert!(!entry.is_expired_at(now + Duration::from_millis(1000)));
        assert!(entry.is_expired_at(now + Duration::from_millis(1001)));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let now = Instant::now();
        let entry = CacheEntry::new_at(1u8, Duration::MAX, now);

        assert_eq!(entry.expires_at, None);
        assert!(!entry.is_expired_at(now + Duration::from_secs(100 * 365 * 24 * 3600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration_with_paused_clock() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(1));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(1001)).await;

        assert!(entry.is_expired());
    }
}
