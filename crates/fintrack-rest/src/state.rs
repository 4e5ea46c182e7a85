//! Application state for Axum handlers.

use fintrack_core::HealthCheck;
use fintrack_service::TransactionService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: Arc<dyn TransactionService>,
    /// Checked by the readiness endpoint.
    pub health_checks: Arc<[Arc<dyn HealthCheck>]>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(transaction_service: Arc<dyn TransactionService>) -> Self {
        Self {
            transaction_service,
            health_checks: Arc::from(Vec::new()),
        }
    }

    /// Sets the components checked by `/ready`.
    #[must_use]
    pub fn with_health_checks(mut self, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        self.health_checks = Arc::from(checks);
        self
    }
}
