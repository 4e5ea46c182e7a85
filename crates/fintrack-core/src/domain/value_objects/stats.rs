//! Aggregate income/expense statistics.

use super::TransactionType;
use crate::{FintrackError, FintrackResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sum and count of one transaction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TypeTotals {
    pub total: Decimal,
    pub count: u64,
}

impl TypeTotals {
    #[must_use]
    pub const fn new(total: Decimal, count: u64) -> Self {
        Self { total, count }
    }
}

/// Grouped totals for a user over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TransactionStats {
    pub income: TypeTotals,
    pub expense: TypeTotals,
    /// `income.total - expense.total`
    pub balance: Decimal,
}

impl TransactionStats {
    /// Builds stats from per-type rows. Types with no row count as zero.
    ///
    /// Fails if a total or the balance leaves the `Decimal` range.
    pub fn from_groups<I>(groups: I) -> FintrackResult<Self>
    where
        I: IntoIterator<Item = (TransactionType, TypeTotals)>,
    {
        let mut income = TypeTotals::default();
        let mut expense = TypeTotals::default();
        for (kind, totals) in groups {
            let slot = match kind {
                TransactionType::Income => &mut income,
                TransactionType::Expense => &mut expense,
            };
            slot.total = slot
                .total
                .checked_add(totals.total)
                .ok_or_else(|| overflow(kind.as_str()))?;
            slot.count = slot.count.saturating_add(totals.count);
        }
        let balance = income
            .total
            .checked_sub(expense.total)
            .ok_or_else(|| overflow("balance"))?;

        Ok(Self {
            income,
            expense,
            balance,
        })
    }

    /// Number of transactions the stats were computed over.
    #[must_use]
    pub const fn transaction_count(&self) -> u64 {
        self.income.count.saturating_add(self.expense.count)
    }
}

fn overflow(what: &str) -> FintrackError {
    FintrackError::internal(format!("{what} total is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_types_default_to_zero() {
        let stats = TransactionStats::from_groups([(
            TransactionType::Expense,
            TypeTotals::new(Decimal::new(50, 0), 1),
        )])
        .unwrap();
        assert_eq!(stats.income, TypeTotals::default());
        assert_eq!(stats.expense.count, 1);
        assert_eq!(stats.balance, Decimal::new(-50, 0));
        assert_eq!(stats.transaction_count(), 1);
    }

    #[test]
    fn test_balance_is_income_minus_expense() {
        let stats = TransactionStats::from_groups([
            (TransactionType::Income, TypeTotals::new(Decimal::new(120_050, 2), 3)),
            (TransactionType::Expense, TypeTotals::new(Decimal::new(20_025, 2), 2)),
        ])
        .unwrap();
        assert_eq!(stats.balance, stats.income.total - stats.expense.total);
        assert_eq!(stats.balance, Decimal::new(100_025, 2));
    }

    #[test]
    fn test_serializes_amounts_as_numbers() {
        let stats = TransactionStats::from_groups([(
            TransactionType::Expense,
            TypeTotals::new(Decimal::new(50, 0), 1),
        )])
        .unwrap();
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["expense"]["total"], serde_json::json!(50.0));
        assert_eq!(json["expense"]["count"], serde_json::json!(1));
        assert_eq!(json["balance"], serde_json::json!(-50.0));
        assert_eq!(json["income"]["total"], serde_json::json!(0.0));
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let err = TransactionStats::from_groups([
            (TransactionType::Income, TypeTotals::new(Decimal::MAX, 1)),
            (TransactionType::Income, TypeTotals::new(Decimal::ONE, 1)),
        ])
        .unwrap_err();
        assert!(matches!(err, FintrackError::Internal(_)));
    }

    #[test]
    fn test_overflowing_balance_is_an_error() {
        let result = TransactionStats::from_groups([
            (TransactionType::Income, TypeTotals::new(Decimal::MAX, 1)),
            (TransactionType::Expense, TypeTotals::new(Decimal::MIN, 1)),
        ]);
        assert!(result.is_err());
    }
}
