//! Value objects.

mod date_range;
mod query_spec;
mod stats;
mod transaction_type;

pub use date_range::{parse_date_bound, DateRange};
pub use query_spec::{QuerySpec, SortField, SortOrder, TypeFilter};
pub use stats::{TransactionStats, TypeTotals};
pub use transaction_type::TransactionType;
