//! Transaction service trait definition.

use crate::dto::{CreateTransactionRequest, TransactionListResponse, TransactionResponse};
use async_trait::async_trait;
use fintrack_core::{
    DateRange, FintrackResult, Interface, QuerySpec, TransactionId, TransactionStats, UserId,
};

/// Transaction service trait.
///
/// Reads are cache-aside; writes go to the system of record first and then
/// invalidate every cached entry of the affected user.
#[async_trait]
pub trait TransactionService: Interface + Send + Sync {
    /// Lists one page of a user's transactions.
    async fn list_transactions(&self, spec: QuerySpec) -> FintrackResult<TransactionListResponse>;

    /// Records a transaction against one of the user's categories.
    async fn create_transaction(
        &self,
        user_id: UserId,
        request: CreateTransactionRequest,
    ) -> FintrackResult<TransactionResponse>;

    /// Deletes a transaction owned by the user.
    async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<TransactionResponse>;

    /// Income/expense totals and balance over an optional date range.
    async fn get_stats(&self, user_id: UserId, range: DateRange) -> FintrackResult<TransactionStats>;
}
