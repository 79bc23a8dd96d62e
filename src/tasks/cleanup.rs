//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! written once and never read again do not accumulate.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::ExpiringCache;

/// Spawns a task sweeping `cache` every `interval`.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = ExpiringCache::<Insight>::new(10_000, Duration::from_secs(3600));
/// let sweeper = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: ExpiringCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    // tokio::time::interval rejects a zero period
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting TTL sweep task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!(removed, remaining = cache.len(), "TTL sweep removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_unread_expired_entries() {
        let cache = ExpiringCache::new(100, HOUR);
        cache
            .set("fitscore:1:MIT", 87u8, Duration::from_secs(1))
            .unwrap();
        cache.set("fitscore:2:MIT", 90u8, HOUR).unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;

        // Removed without any read touching the key
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().expirations, 1);
        assert_eq!(cache.stats().misses, 0);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_valid_entries() {
        let cache = ExpiringCache::new(100, HOUR);
        cache.set("long_lived", "value".to_string(), HOUR).unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived").unwrap(), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = ExpiringCache::<u8>::new(100, HOUR);

        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));
        handle.abort();

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
