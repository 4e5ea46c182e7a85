//! In-process transaction query engine.
//!
//! Mirrors the MySQL engine's semantics (ownership scoping, inclusive date
//! bounds, id tie-break) over plain maps. Used by tests.

use crate::traits::TransactionQueryEngine;
use async_trait::async_trait;
use fintrack_core::{
    Category, CategoryId, DateRange, FintrackError, FintrackResult, NewTransaction, Page,
    QuerySpec, SortField, SortOrder, Transaction, TransactionDetails, TransactionId,
    TransactionStats, TypeTotals, UserId,
};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
struct Store {
    categories: HashMap<CategoryId, Category>,
    transactions: HashMap<TransactionId, Transaction>,
}

impl Store {
    fn details(&self, transaction: &Transaction) -> FintrackResult<TransactionDetails> {
        let category = self
            .categories
            .get(&transaction.category_id)
            .cloned()
            .ok_or_else(|| {
                FintrackError::Internal(format!(
                    "Transaction {} references missing category {}",
                    transaction.id, transaction.category_id
                ))
            })?;
        Ok(TransactionDetails {
            transaction: transaction.clone(),
            category,
        })
    }
}

/// [`TransactionQueryEngine`] backed by in-memory maps.
#[derive(Default)]
pub struct InMemoryTransactionQueryEngine {
    store: RwLock<Store>,
}

impl InMemoryTransactionQueryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and stores a category owned by `user_id`.
    pub fn add_category(&self, user_id: UserId, name: &str) -> Category {
        let category = Category::new(user_id, name);
        self.store
            .write()
            .categories
            .insert(category.id, category.clone());
        category
    }

    /// Number of stored transactions across all users.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.store.read().transactions.len()
    }
}

fn compare(a: &TransactionDetails, b: &TransactionDetails, field: SortField) -> Ordering {
    let (ta, tb) = (&a.transaction, &b.transaction);
    match field {
        SortField::Date => ta.date.cmp(&tb.date),
        SortField::Amount => ta.amount.cmp(&tb.amount),
        SortField::Type => ta.transaction_type.as_str().cmp(tb.transaction_type.as_str()),
        SortField::Description => ta.description.cmp(&tb.description),
        SortField::Category => a.category.name.cmp(&b.category.name),
        SortField::CreatedAt => ta.created_at.cmp(&tb.created_at),
    }
}

fn sort_details(items: &mut [TransactionDetails], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| {
        let primary = compare(a, b, field);
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.transaction.id.cmp(&b.transaction.id))
    });
}

#[async_trait]
impl TransactionQueryEngine for InMemoryTransactionQueryEngine {
    async fn list(&self, spec: &QuerySpec) -> FintrackResult<Page<TransactionDetails>> {
        debug!(user_id = %spec.user_id, "Listing transactions (memory)");

        let store = self.store.read();
        let mut matches = store
            .transactions
            .values()
            .filter(|t| {
                t.user_id == spec.user_id
                    && spec.filter.matches(t.transaction_type)
                    && spec.range.contains(t.date)
            })
            .map(|t| store.details(t))
            .collect::<FintrackResult<Vec<_>>>()?;
        drop(store);

        sort_details(&mut matches, spec.sort, spec.order);

        let total = matches.len() as u64;
        let offset = usize::try_from(spec.page.offset()).unwrap_or(usize::MAX);
        let content = matches
            .into_iter()
            .skip(offset)
            .take(spec.page.limit as usize)
            .collect();

        Ok(Page::new(content, spec.page, total))
    }

    async fn create(&self, input: NewTransaction) -> FintrackResult<TransactionDetails> {
        let mut store = self.store.write();

        let category = store
            .categories
            .get(&input.category_id)
            .filter(|c| c.is_owned_by(input.user_id))
            .cloned()
            .ok_or_else(FintrackError::invalid_category)?;

        let transaction = input.into_transaction();
        store.transactions.insert(transaction.id, transaction.clone());
        debug!(transaction_id = %transaction.id, "Created transaction (memory)");

        Ok(TransactionDetails {
            transaction,
            category,
        })
    }

    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<TransactionDetails> {
        let mut store = self.store.write();

        let owned = store
            .transactions
            .get(&id)
            .is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Err(FintrackError::not_found("Transaction", id));
        }

        let transaction = store
            .transactions
            .remove(&id)
            .ok_or_else(|| FintrackError::not_found("Transaction", id))?;
        store.details(&transaction)
    }

    async fn aggregate(&self, user_id: UserId, range: DateRange) -> FintrackResult<TransactionStats> {
        let store = self.store.read();
        let groups = store
            .transactions
            .values()
            .filter(|t| t.user_id == user_id && range.contains(t.date))
            .map(|t| (t.transaction_type, TypeTotals::new(t.amount, 1)));

        TransactionStats::from_groups(groups)
    }
}

impl std::fmt::Debug for InMemoryTransactionQueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTransactionQueryEngine")
            .field("transactions", &self.transaction_count())
            .finish_non_exhaustive()
    }
}
