//! Query-string extractors for transaction listings and stats.
//!
//! Every field is kept as a raw string and normalized leniently: unknown
//! or malformed values fall back to their defaults instead of rejecting
//! the request.

use fintrack_core::{
    DateRange, PageRequest, QuerySpec, SortField, SortOrder, TypeFilter, UserId,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /transactions`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTransactionsQuery {
    /// `all`, `income` or `expense`.
    pub filter: Option<String>,
    /// `date`, `amount`, `type`, `category`, `description` or `createdAt`.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    /// 1-indexed page number.
    pub page: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
    /// Inclusive lower bound (RFC 3339 or `YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive upper bound (RFC 3339 or `YYYY-MM-DD`).
    pub end_date: Option<String>,
}

impl ListTransactionsQuery {
    /// Normalizes the raw parameters into a query for `user_id`.
    #[must_use]
    pub fn into_spec(self, user_id: UserId) -> QuerySpec {
        QuerySpec::new(user_id)
            .with_filter(TypeFilter::from_raw(self.filter.as_deref()))
            .with_sort(
                SortField::from_raw(self.sort.as_deref()),
                SortOrder::from_raw(self.order.as_deref()),
            )
            .with_page(PageRequest::from_raw(
                self.page.as_deref(),
                self.limit.as_deref(),
            ))
            .with_range(DateRange::from_raw(
                self.start_date.as_deref(),
                self.end_date.as_deref(),
            ))
    }
}

/// Query parameters for `GET /transactions/stats`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Inclusive lower bound (RFC 3339 or `YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive upper bound (RFC 3339 or `YYYY-MM-DD`).
    pub end_date: Option<String>,
}

impl From<StatsQuery> for DateRange {
    fn from(query: StatsQuery) -> Self {
        DateRange::from_raw(query.start_date.as_deref(), query.end_date.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};
    use chrono::{TimeZone, Utc};
    use fintrack_core::TransactionType;

    fn parse(query: &str) -> ListTransactionsQuery {
        let uri: Uri = format!("/transactions?{query}").parse().unwrap();
        Query::<ListTransactionsQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let user = UserId::new();
        assert_eq!(parse("").into_spec(user), QuerySpec::new(user));
    }

    #[test]
    fn test_full_query() {
        let user = UserId::new();
        let spec = parse(
            "filter=income&sort=amount&order=asc&page=2&limit=25&startDate=2024-01-01&endDate=2024-01-31T23:59:59Z",
        )
        .into_spec(user);

        assert_eq!(spec.filter, TypeFilter::Only(TransactionType::Income));
        assert_eq!(spec.sort, SortField::Amount);
        assert_eq!(spec.order, SortOrder::Asc);
        assert_eq!(spec.page, PageRequest::new(2, 25));
        assert_eq!(
            spec.range.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            spec.range.end,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn test_malformed_values_degrade_to_defaults() {
        let user = UserId::new();
        let spec = parse("filter=transfer&sort=password&order=up&page=abc&limit=0&startDate=soon")
            .into_spec(user);
        assert_eq!(spec, QuerySpec::new(user));
    }

    #[test]
    fn test_limit_is_capped() {
        let spec = parse("limit=5000").into_spec(UserId::new());
        assert_eq!(spec.page.limit, PageRequest::MAX_LIMIT);
    }

    #[test]
    fn test_stats_query_range() {
        let range = DateRange::from(StatsQuery {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        });
        assert!(range.start.is_some());
        assert!(range.end.is_none());
    }
}
