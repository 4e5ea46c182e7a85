//! Readiness check over whichever cache store the module resolved.

use super::CacheStore;
use async_trait::async_trait;
use fintrack_core::{HealthCheck, HealthStatus};
use std::sync::Arc;

/// Reports a disabled or unreachable cache as degraded, never as down:
/// reads fall through to the query engine when the cache is gone.
pub struct CacheHealthCheck {
    cache: Arc<dyn CacheStore>,
}

impl CacheHealthCheck {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }
        match self.cache.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }

    fn is_critical(&self) -> bool {
        false
    }
}
