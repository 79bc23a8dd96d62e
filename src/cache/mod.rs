//! Cache Module
//!
//! In-memory caching with TTL expiration, a capacity bound and
//! least-recently-set eviction.

mod entry;
mod key;
mod order;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{validate_key, CacheKey, KEY_SEPARATOR};
pub use order::SetOrder;
pub use shared::ExpiringCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;
