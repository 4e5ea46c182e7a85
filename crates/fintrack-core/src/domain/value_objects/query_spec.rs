//! Typed description of a transaction listing query.

use super::{DateRange, TransactionType};
use crate::{PageRequest, UserId};
use serde::{Deserialize, Serialize};

/// Which transaction types a listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    /// Lenient parse: anything other than `income` or `expense` means all.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse::<TransactionType>().ok())
            .map_or(Self::All, Self::Only)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }

    /// Whether a transaction of type `kind` passes this filter.
    #[must_use]
    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == kind,
        }
    }
}

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Type,
    Description,
    /// Orders by the category's name.
    Category,
    CreatedAt,
}

impl SortField {
    /// Lenient parse: unknown field names fall back to `date`.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("amount") => Self::Amount,
            Some("type") => Self::Type,
            Some("description") => Self::Description,
            Some("category") => Self::Category,
            Some("createdAt") => Self::CreatedAt,
            _ => Self::Date,
        }
    }

    /// Name used in query strings and cache keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Type => "type",
            Self::Description => "description",
            Self::Category => "category",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only `asc` selects ascending order; everything else is descending.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Immutable description of one listing request for one user.
///
/// Every field is normalized, so two specs that compare equal always
/// describe the same result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuerySpec {
    pub user_id: UserId,
    pub filter: TypeFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: PageRequest,
    pub range: DateRange,
}

impl QuerySpec {
    /// A spec with every parameter at its default.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            filter: TypeFilter::All,
            sort: SortField::Date,
            order: SortOrder::Desc,
            page: PageRequest::first(),
            range: DateRange::unbounded(),
        }
    }

    #[must_use]
    pub const fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub const fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}
