//! Category entity.

use crate::{CategoryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned label that transactions are filed under.
///
/// Categories are managed elsewhere; this crate only reads them to resolve
/// and authorize the reference carried by a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category owned by `user_id`.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the category may be referenced by `user_id`'s transactions.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
