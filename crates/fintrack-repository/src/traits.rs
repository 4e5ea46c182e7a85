//! Repository trait definitions.

use fintrack_core::{
    DateRange, FintrackResult, Interface, NewTransaction, Page, QuerySpec, TransactionDetails,
    TransactionId, TransactionStats, UserId,
};
use async_trait::async_trait;

/// Filtered, sorted, paginated reads and grouped aggregation over a
/// user's transactions, plus the create/delete write path.
///
/// Every operation is scoped to one user: a transaction or category owned
/// by someone else behaves exactly as if it did not exist.
#[async_trait]
pub trait TransactionQueryEngine: Interface + Send + Sync {
    /// Returns one page of transactions matching `spec`, with the total
    /// number of matches across all pages.
    ///
    /// Results are ordered by `spec.sort`/`spec.order`, ties broken by id
    /// ascending. A page past the end is empty but still carries the total.
    async fn list(&self, spec: &QuerySpec) -> FintrackResult<Page<TransactionDetails>>;

    /// Persists a new transaction.
    ///
    /// Fails with `InvalidReference` when the category does not exist or is
    /// owned by another user.
    async fn create(&self, input: NewTransaction) -> FintrackResult<TransactionDetails>;

    /// Deletes a transaction owned by `user_id` and returns it.
    ///
    /// Fails with `NotFound` when no such transaction is owned by the user.
    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<TransactionDetails>;

    /// Sums and counts the user's transactions per type within `range`.
    async fn aggregate(&self, user_id: UserId, range: DateRange) -> FintrackResult<TransactionStats>;
}
