//! Cache key generators for transaction queries.
//!
//! Every key for a user starts with `<namespace>:<userId>:`, so a single
//! `<namespace>:<userId>:*` scan reaches all of that user's entries.
//!
//! Listing keys:
//!
//! ```text
//! <namespace>:<userId>:<filter>:<sort>:<order>:<page>:<limit>:<startDate>:<endDate>
//! ```
//!
//! Stats keys:
//!
//! ```text
//! <namespace>:<userId>:stats:<startDate>:<endDate>
//! ```

use chrono::{DateTime, Utc};
use fintrack_core::{DateRange, QuerySpec, UserId};

/// Default key namespace.
pub const DEFAULT_NAMESPACE: &str = "transactions";

/// Serialized form of an absent date bound.
const ABSENT: &str = "_";

/// Builds cache keys under a fixed namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyBuilder {
    namespace: String,
}

impl CacheKeyBuilder {
    /// Create a key builder. The namespace must not contain `:` or glob characters.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The namespace every key starts with.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key for one transaction listing.
    #[must_use]
    pub fn listing_key(&self, spec: &QuerySpec) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.namespace,
            spec.user_id,
            spec.filter.as_str(),
            spec.sort.as_str(),
            spec.order.as_str(),
            spec.page.page,
            spec.page.limit,
            date_segment(spec.range.start),
            date_segment(spec.range.end),
        )
    }

    /// Key for a user's aggregate stats over a date range.
    #[must_use]
    pub fn stats_key(&self, user_id: UserId, range: DateRange) -> String {
        format!(
            "{}:{}:stats:{}:{}",
            self.namespace,
            user_id,
            date_segment(range.start),
            date_segment(range.end),
        )
    }

    /// Pattern matching every cached entry for a user.
    #[must_use]
    pub fn user_pattern(&self, user_id: UserId) -> String {
        format!("{}:{}:*", self.namespace, user_id)
    }
}

impl Default for CacheKeyBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

fn date_segment(bound: Option<DateTime<Utc>>) -> String {
    match bound {
        None => ABSENT.to_string(),
        Some(ts) => {
            let sub_milli = ts.timestamp_subsec_nanos() % 1_000_000;
            if sub_milli == 0 {
                ts.timestamp_millis().to_string()
            } else {
                format!("{}.{:06}", ts.timestamp_millis(), sub_milli)
            }
        }
    }
}
