//! Caching infrastructure for the service layer.
//!
//! [`CacheStore`] abstracts the key/value backend; [`RedisCacheStore`] is
//! the production implementation and [`InMemoryCacheStore`] backs tests
//! and deployments configured with `cache.backend = "memory"`.
//! [`CacheKeyBuilder`] owns the key layout.

mod cache_store;
pub mod cache_keys;
mod health;
mod memory_cache;
mod redis_cache;

pub use cache_keys::{CacheKeyBuilder, DEFAULT_NAMESPACE};
pub use cache_store::{CacheExt, CacheStore, ScanBatch, ScanCursor};
#[cfg(test)]
pub use cache_store::MockCacheStore;
pub use health::CacheHealthCheck;
pub use memory_cache::InMemoryCacheStore;
pub use redis_cache::{create_redis_pool, RedisCacheStore, RedisCacheStoreParameters};

use std::time::Duration;

/// Default TTL for cached query results (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default number of keys requested per `SCAN` round.
pub const DEFAULT_SCAN_BATCH: u32 = 100;
