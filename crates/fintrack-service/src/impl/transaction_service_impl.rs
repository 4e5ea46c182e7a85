//! Cache-aside transaction service.

use crate::cache::{CacheExt, CacheKeyBuilder, CacheStore, DEFAULT_SCAN_BATCH, DEFAULT_TTL};
use crate::dto::{CreateTransactionRequest, TransactionListResponse, TransactionResponse};
use crate::metrics;
use crate::transaction_service::TransactionService;
use async_trait::async_trait;
use fintrack_config::CacheConfig;
use fintrack_core::{
    DateRange, FintrackResult, QuerySpec, TransactionId, TransactionStats, UserId, ValidateExt,
};
use fintrack_repository::TransactionQueryEngine;
use serde::{de::DeserializeOwned, Serialize};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const LISTING: &str = "listing";
const STATS: &str = "stats";

/// [`TransactionService`] with a cache-aside read path over a
/// [`TransactionQueryEngine`].
///
/// Cache failures never reach the caller: a failed read is a miss, a failed
/// populate is skipped and a failed invalidation is logged. Concurrent misses
/// on one key each recompute and overwrite it.
#[derive(Component)]
#[shaku(interface = TransactionService)]
pub struct TransactionCacheService {
    #[shaku(inject)]
    engine: Arc<dyn TransactionQueryEngine>,
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    #[shaku(default)]
    keys: CacheKeyBuilder,
    #[shaku(default = DEFAULT_TTL)]
    ttl: Duration,
    #[shaku(default = DEFAULT_SCAN_BATCH)]
    scan_batch: u32,
}

impl From<&CacheConfig> for TransactionCacheServiceParameters {
    fn from(config: &CacheConfig) -> Self {
        Self {
            keys: CacheKeyBuilder::new(config.namespace.clone()),
            ttl: config.ttl(),
            scan_batch: config.scan_batch_size,
        }
    }
}

impl TransactionCacheService {
    /// Creates a service with the default namespace, TTL and scan batch.
    pub fn new(engine: Arc<dyn TransactionQueryEngine>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            engine,
            cache,
            keys: CacheKeyBuilder::default(),
            ttl: DEFAULT_TTL,
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }

    /// Creates a service from the `[cache]` configuration section.
    pub fn with_config(
        engine: Arc<dyn TransactionQueryEngine>,
        cache: Arc<dyn CacheStore>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            engine,
            cache,
            keys: CacheKeyBuilder::new(config.namespace.clone()),
            ttl: config.ttl(),
            scan_batch: config.scan_batch_size,
        }
    }

    /// The key layout used by this service.
    #[must_use]
    pub fn keys(&self) -> &CacheKeyBuilder {
        &self.keys
    }

    async fn cached<T: DeserializeOwned + Send>(&self, key: &str, kind: &'static str) -> Option<T> {
        match self.cache.get::<T>(key).await {
            Ok(Some(value)) => {
                debug!("Cache hit for key '{}'", key);
                metrics::record_hit(kind);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key '{}'", key);
                metrics::record_miss(kind);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, reading from the database");
                metrics::record_error("get");
                metrics::record_miss(kind);
                None
            }
        }
    }

    async fn populate<T: Serialize + Send + Sync>(&self, key: &str, value: &T, kind: &'static str) {
        match self.cache.set(key, value, self.ttl).await {
            Ok(()) => metrics::record_populate(kind),
            Err(e) => {
                warn!(key, error = %e, "Cache populate failed");
                metrics::record_error("set");
            }
        }
    }

    /// Drops every cached entry of `user_id`. Best effort, never retried.
    async fn invalidate_user(&self, user_id: UserId) {
        let pattern = self.keys.user_pattern(user_id);
        match self.cache.delete_matching(&pattern, self.scan_batch).await {
            Ok(deleted) => {
                debug!("Invalidated {} cache keys matching '{}'", deleted, pattern);
                metrics::record_invalidation(deleted);
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    pattern = %pattern,
                    error = %e,
                    "Cache invalidation failed; stale entries expire with their TTL"
                );
                metrics::record_error("invalidate");
            }
        }
    }
}

#[async_trait]
impl TransactionService for TransactionCacheService {
    async fn list_transactions(&self, spec: QuerySpec) -> FintrackResult<TransactionListResponse> {
        let key = self.keys.listing_key(&spec);

        if let Some(cached) = self.cached::<TransactionListResponse>(&key, LISTING).await {
            return Ok(cached);
        }

        let page = self.engine.list(&spec).await?;
        let response = TransactionListResponse::from(page);

        self.populate(&key, &response, LISTING).await;

        Ok(response)
    }

    async fn create_transaction(
        &self,
        user_id: UserId,
        request: CreateTransactionRequest,
    ) -> FintrackResult<TransactionResponse> {
        debug!("Creating transaction for user: {}", user_id);

        request.validate_request()?;
        let input = request.into_new_transaction(user_id)?;

        let created = self.engine.create(input).await?;
        self.invalidate_user(user_id).await;

        info!("Transaction created: {}", created.transaction.id);
        Ok(TransactionResponse::from(created))
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<TransactionResponse> {
        debug!("Deleting transaction {} for user: {}", id, user_id);

        let deleted = self.engine.delete(user_id, id).await?;
        self.invalidate_user(user_id).await;

        info!("Transaction deleted: {}", id);
        Ok(TransactionResponse::from(deleted))
    }

    async fn get_stats(&self, user_id: UserId, range: DateRange) -> FintrackResult<TransactionStats> {
        let key = self.keys.stats_key(user_id, range);

        if let Some(cached) = self.cached::<TransactionStats>(&key, STATS).await {
            return Ok(cached);
        }

        let stats = self.engine.aggregate(user_id, range).await?;

        self.populate(&key, &stats, STATS).await;

        Ok(stats)
    }
}

impl std::fmt::Debug for TransactionCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCacheService")
            .field("keys", &self.keys)
            .field("ttl", &self.ttl)
            .field("scan_batch", &self.scan_batch)
            .finish_non_exhaustive()
    }
}
