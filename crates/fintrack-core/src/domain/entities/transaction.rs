//! Transaction entity.

use super::Category;
use crate::{CategoryId, TransactionId, TransactionType, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single income or expense record.
///
/// Transactions are immutable once written: they are created and deleted,
/// never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction.
    pub id: TransactionId,

    /// Owner of the transaction.
    pub user_id: UserId,

    /// Income or expense.
    pub transaction_type: TransactionType,

    /// Category the transaction is filed under.
    pub category_id: CategoryId,

    /// Monetary amount.
    pub amount: Decimal,

    /// When the transaction happened (UTC).
    pub date: DateTime<Utc>,

    /// Free-form description.
    pub description: String,

    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// A transaction together with its resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: Transaction,
    pub category: Category,
}

/// Input for creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub transaction_type: TransactionType,
    pub category_id: CategoryId,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
}

impl NewTransaction {
    /// Assigns an id and creation timestamp.
    #[must_use]
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            user_id: self.user_id,
            transaction_type: self.transaction_type,
            category_id: self.category_id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            created_at: Utc::now(),
        }
    }
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(amount: Decimal) -> NewTransaction {
        NewTransaction {
            user_id: UserId::new(),
            transaction_type: TransactionType::Expense,
            category_id: CategoryId::new(),
            amount,
            date: Utc::now(),
            description: "Coffee".to_string(),
        }
    }

    #[test]
    fn test_into_transaction_keeps_fields() {
        let input = new_expense(Decimal::new(450, 2));
        let tx = input.clone().into_transaction();
        assert_eq!(tx.user_id, input.user_id);
        assert_eq!(tx.category_id, input.category_id);
        assert_eq!(tx.amount, Decimal::new(450, 2));
        assert_eq!(tx.description, "Coffee");
    }

    #[test]
    fn test_signed_amount() {
        let tx = new_expense(Decimal::new(50, 0)).into_transaction();
        assert_eq!(tx.signed_amount(), Decimal::new(-50, 0));
    }
}
