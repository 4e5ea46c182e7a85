//! Redis-based cache store.

use super::{CacheStore, ScanBatch, ScanCursor};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use fintrack_config::RedisConfig;
use fintrack_core::{FintrackError, FintrackResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Redis-backed [`CacheStore`].
///
/// A store without a pool (see [`RedisCacheStore::disabled`]) always misses,
/// accepts and drops writes, and has nothing to invalidate. That is also
/// what the component resolves to when no pool parameter is supplied.
#[derive(Clone, Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    #[shaku(default)]
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a cache store over a connection pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache store (for when Redis is disabled or unreachable).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> FintrackResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| FintrackError::cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(FintrackError::cache("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis connection pool closed");
        }
    }

    async fn get_raw(&self, key: &str) -> FintrackResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| FintrackError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FintrackResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| FintrackError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn scan(
        &self,
        pattern: &str,
        cursor: ScanCursor,
        count: u32,
    ) -> FintrackResult<ScanBatch> {
        if !self.is_enabled() {
            return Ok(ScanBatch::default());
        }

        let mut conn = self.get_conn().await?;
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor.0)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut *conn)
            .await
            .map_err(|e| FintrackError::cache(format!("Failed to scan '{}': {}", pattern, e)))?;

        Ok(ScanBatch {
            keys,
            next: ScanCursor(next),
        })
    }

    async fn delete_keys(&self, keys: &[String]) -> FintrackResult<u64> {
        if !self.is_enabled() || keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let deleted: u64 = conn
            .del(keys)
            .await
            .map_err(|e| FintrackError::cache(format!("Failed to delete keys: {}", e)))?;

        debug!("Deleted {} of {} scanned keys", deleted, keys.len());
        Ok(deleted)
    }

    async fn ping(&self) -> FintrackResult<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| FintrackError::cache(format!("PING failed: {}", e)))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Create a Redis connection pool and verify it with `PING`.
pub async fn create_redis_pool(config: &RedisConfig) -> FintrackResult<Pool> {
    info!("Creating Redis connection pool...");

    let cfg = Config::from_url(&config.url);

    let pool = cfg
        .builder()
        .map_err(|e| FintrackError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size as usize)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| FintrackError::Configuration(format!("Failed to create pool: {}", e)))?;

    // Test connection
    let mut conn = pool
        .get()
        .await
        .map_err(|e| FintrackError::BackendUnavailable(format!("Redis unreachable: {}", e)))?;
    redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| FintrackError::BackendUnavailable(format!("Redis PING failed: {}", e)))?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}
