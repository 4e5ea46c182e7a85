//! MySQL transaction query engine.

use crate::{traits::TransactionQueryEngine, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fintrack_core::{
    Category, CategoryId, DateRange, FintrackError, FintrackResult, NewTransaction, Page,
    QuerySpec, SortField, SortOrder, Transaction, TransactionDetails, TransactionId,
    TransactionStats, TransactionType, TypeFilter, TypeTotals, UserId,
};
use rust_decimal::Decimal;
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const DETAILS_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.transaction_type, t.category_id, t.amount, t.date,
           t.description, t.created_at,
           c.name AS category_name, c.created_at AS category_created_at
    FROM transactions t
    INNER JOIN categories c ON c.id = t.category_id
"#;

/// MySQL-backed [`TransactionQueryEngine`].
#[derive(Clone, Component)]
#[shaku(interface = TransactionQueryEngine)]
pub struct MySqlTransactionQueryEngine {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTransactionQueryEngine {
    /// Creates a new engine over the given pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Joined transaction + category row.
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String, // MySQL stores UUID as CHAR(36)
    user_id: String,
    transaction_type: String,
    category_id: String,
    amount: Decimal,
    date: DateTime<Utc>,
    description: String,
    created_at: DateTime<Utc>,
    category_name: String,
    category_created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TypeTotalsRow {
    transaction_type: String,
    total: Decimal,
    count: i64,
}

fn parse_uuid(raw: &str) -> FintrackResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| FintrackError::Internal(format!("Invalid UUID in database: {}", e)))
}

fn parse_type(raw: &str) -> FintrackResult<TransactionType> {
    raw.parse::<TransactionType>().map_err(FintrackError::Internal)
}

impl TryFrom<TransactionRow> for TransactionDetails {
    type Error = FintrackError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let user_id = UserId::from_uuid(parse_uuid(&row.user_id)?);
        let category_id = CategoryId::from_uuid(parse_uuid(&row.category_id)?);

        Ok(TransactionDetails {
            transaction: Transaction {
                id: TransactionId::from_uuid(parse_uuid(&row.id)?),
                user_id,
                transaction_type: parse_type(&row.transaction_type)?,
                category_id,
                amount: row.amount,
                date: row.date,
                description: row.description,
                created_at: row.created_at,
            },
            category: Category {
                id: category_id,
                user_id,
                name: row.category_name,
                created_at: row.category_created_at,
            },
        })
    }
}

/// ORDER BY column for a sort field. Only these fixed strings ever reach the SQL text.
const fn order_column(field: SortField) -> &'static str {
    match field {
        SortField::Date => "t.date",
        SortField::Amount => "t.amount",
        SortField::Type => "t.transaction_type",
        SortField::Description => "t.description",
        SortField::Category => "c.name",
        SortField::CreatedAt => "t.created_at",
    }
}

const fn order_keyword(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

fn push_user_and_range(qb: &mut QueryBuilder<'_, MySql>, user_id: UserId, range: DateRange) {
    qb.push(" WHERE t.user_id = ");
    qb.push_bind(user_id.to_string());
    if let Some(start) = range.start {
        qb.push(" AND t.date >= ");
        qb.push_bind(start);
    }
    if let Some(end) = range.end {
        qb.push(" AND t.date <= ");
        qb.push_bind(end);
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, MySql>, spec: &QuerySpec) {
    push_user_and_range(qb, spec.user_id, spec.range);
    if let TypeFilter::Only(kind) = spec.filter {
        qb.push(" AND t.transaction_type = ");
        qb.push_bind(kind.as_str());
    }
}

impl MySqlTransactionQueryEngine {
    async fn fetch_details<'e, E>(
        executor: E,
        user_id: UserId,
        id: TransactionId,
    ) -> FintrackResult<Option<TransactionDetails>>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let sql = format!("{DETAILS_SELECT} WHERE t.id = ? AND t.user_id = ?");
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(executor)
            .await?;

        row.map(TransactionDetails::try_from).transpose()
    }
}

#[async_trait]
impl TransactionQueryEngine for MySqlTransactionQueryEngine {
    async fn list(&self, spec: &QuerySpec) -> FintrackResult<Page<TransactionDetails>> {
        debug!(
            user_id = %spec.user_id,
            filter = spec.filter.as_str(),
            sort = spec.sort.as_str(),
            order = spec.order.as_str(),
            page = spec.page.page,
            limit = spec.page.limit,
            "Listing transactions"
        );

        let mut count_qb: QueryBuilder<'_, MySql> =
            QueryBuilder::new("SELECT COUNT(*) FROM transactions t");
        push_filters(&mut count_qb, spec);
        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;

        let mut qb: QueryBuilder<'_, MySql> = QueryBuilder::new(DETAILS_SELECT);
        push_filters(&mut qb, spec);
        qb.push(format!(
            " ORDER BY {} {}, t.id ASC LIMIT ",
            order_column(spec.sort),
            order_keyword(spec.order)
        ));
        qb.push_bind(i64::from(spec.page.limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(spec.page.offset()).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<TransactionRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let content = rows
            .into_iter()
            .map(TransactionDetails::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, spec.page, u64::try_from(total).unwrap_or(0)))
    }

    async fn create(&self, input: NewTransaction) -> FintrackResult<TransactionDetails> {
        debug!(user_id = %input.user_id, category_id = %input.category_id, "Creating transaction");

        let mut tx = self.pool.inner().begin().await?;

        let owned: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ? AND user_id = ? LIMIT 1")
                .bind(input.category_id.to_string())
                .bind(input.user_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(FintrackError::invalid_category());
        }

        let transaction = input.into_transaction();

        // MySQL doesn't support RETURNING, so insert then select
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, transaction_type, category_id, amount,
                                      date, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.user_id.to_string())
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.category_id.to_string())
        .bind(transaction.amount)
        .bind(transaction.date)
        .bind(&transaction.description)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        let details = Self::fetch_details(&mut *tx, transaction.user_id, transaction.id)
            .await?
            .ok_or_else(|| FintrackError::Internal("Failed to fetch inserted transaction".to_string()))?;

        tx.commit().await?;
        Ok(details)
    }

    async fn delete(&self, user_id: UserId, id: TransactionId) -> FintrackResult<TransactionDetails> {
        debug!(user_id = %user_id, transaction_id = %id, "Deleting transaction");

        let mut tx = self.pool.inner().begin().await?;

        let details = Self::fetch_details(&mut *tx, user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Transaction", id))?;

        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FintrackError::not_found("Transaction", id));
        }

        tx.commit().await?;
        Ok(details)
    }

    async fn aggregate(&self, user_id: UserId, range: DateRange) -> FintrackResult<TransactionStats> {
        debug!(user_id = %user_id, "Aggregating transaction stats");

        let mut qb: QueryBuilder<'_, MySql> = QueryBuilder::new(
            "SELECT t.transaction_type, COALESCE(SUM(t.amount), 0) AS total, COUNT(*) AS count \
             FROM transactions t",
        );
        push_user_and_range(&mut qb, user_id, range);
        qb.push(" GROUP BY t.transaction_type");

        let rows = qb
            .build_query_as::<TypeTotalsRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let groups = rows
            .into_iter()
            .map(|row| {
                let kind = parse_type(&row.transaction_type)?;
                let count = u64::try_from(row.count).unwrap_or(0);
                Ok((kind, TypeTotals::new(row.total, count)))
            })
            .collect::<FintrackResult<Vec<_>>>()?;

        TransactionStats::from_groups(groups)
    }
}

impl std::fmt::Debug for MySqlTransactionQueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTransactionQueryEngine").finish_non_exhaustive()
    }
}
