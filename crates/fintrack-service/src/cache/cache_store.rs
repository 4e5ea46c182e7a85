//! Cache store trait for abstracted key/value caching.

use async_trait::async_trait;
use fintrack_core::{FintrackResult, Interface};
use std::time::Duration;

/// Position in a cursor-based key scan.
///
/// Iteration starts at [`ScanCursor::START`] and is finished once the store
/// hands the same sentinel back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScanCursor(pub u64);

impl ScanCursor {
    /// Start (and end) sentinel.
    pub const START: Self = Self(0);

    /// Returns true if this cursor is the sentinel.
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 == 0
    }
}

/// One page of a key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBatch {
    /// Keys matched in this batch. May be empty even when iteration continues.
    pub keys: Vec<String>,
    /// Cursor to resume from.
    pub next: ScanCursor,
}

/// Key/value store with per-entry TTL and pattern-based bulk deletion.
///
/// Values are JSON strings so the trait stays dyn-compatible; use
/// [`CacheExt`] for typed access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Get a raw value. Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> FintrackResult<Option<String>>;

    /// Set a raw value, replacing any existing entry.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FintrackResult<()>;

    /// Scan one batch of keys matching a glob pattern.
    ///
    /// `count` is a hint; a store may return more or fewer keys.
    async fn scan(&self, pattern: &str, cursor: ScanCursor, count: u32)
        -> FintrackResult<ScanBatch>;

    /// Delete the given keys. Returns the number actually removed.
    async fn delete_keys(&self, keys: &[String]) -> FintrackResult<u64>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> FintrackResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;

    /// Release backend connections. Later operations miss or fail.
    fn close(&self) {}

    /// Delete every key matching `pattern`.
    ///
    /// Walks the key space with [`scan`](Self::scan), deleting each batch
    /// before advancing, until the cursor returns to [`ScanCursor::START`].
    async fn delete_matching(&self, pattern: &str, batch_size: u32) -> FintrackResult<u64> {
        let mut cursor = ScanCursor::START;
        let mut deleted = 0;

        loop {
            let batch = self.scan(pattern, cursor, batch_size).await?;
            if !batch.keys.is_empty() {
                deleted += self.delete_keys(&batch.keys).await?;
            }
            if batch.next.is_start() {
                break;
            }
            cursor = batch.next;
        }

        Ok(deleted)
    }
}

/// Typed convenience methods over [`CacheStore`].
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> FintrackResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> FintrackResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheStore + ?Sized> CacheExt for T {}
