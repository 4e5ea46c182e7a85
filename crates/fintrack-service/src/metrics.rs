//! Cache metrics.
//!
//! Recorded through the `metrics` facade; the server installs a Prometheus
//! recorder when metrics are enabled, otherwise these calls are no-ops.

use metrics::{counter, describe_counter};

/// Metric names for the transaction cache.
pub mod names {
    /// Reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "fintrack_cache_hits_total";
    /// Reads that fell through to the query engine.
    pub const CACHE_MISSES_TOTAL: &str = "fintrack_cache_misses_total";
    /// Entries written after a miss.
    pub const CACHE_POPULATES_TOTAL: &str = "fintrack_cache_populates_total";
    /// Cache operations that failed and were skipped.
    pub const CACHE_ERRORS_TOTAL: &str = "fintrack_cache_errors_total";
    /// Per-user invalidations completed.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "fintrack_cache_invalidations_total";
    /// Keys removed by invalidations.
    pub const CACHE_INVALIDATED_KEYS_TOTAL: &str = "fintrack_cache_invalidated_keys_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_POPULATES_TOTAL,
        "Total number of cache entries populated after a miss"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of cache operations that failed and were skipped"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of per-user cache invalidations"
    );
    describe_counter!(
        names::CACHE_INVALIDATED_KEYS_TOTAL,
        "Total number of cache keys removed by invalidation"
    );
}

/// Record a cache hit.
pub fn record_hit(kind: &'static str) {
    counter!(names::CACHE_HITS_TOTAL, "kind" => kind).increment(1);
}

/// Record a cache miss.
pub fn record_miss(kind: &'static str) {
    counter!(names::CACHE_MISSES_TOTAL, "kind" => kind).increment(1);
}

/// Record a populated entry.
pub fn record_populate(kind: &'static str) {
    counter!(names::CACHE_POPULATES_TOTAL, "kind" => kind).increment(1);
}

/// Record a failed cache operation.
pub fn record_error(operation: &'static str) {
    counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
}

/// Record a completed invalidation.
pub fn record_invalidation(keys: u64) {
    counter!(names::CACHE_INVALIDATIONS_TOTAL).increment(1);
    counter!(names::CACHE_INVALIDATED_KEYS_TOTAL).increment(keys);
}
