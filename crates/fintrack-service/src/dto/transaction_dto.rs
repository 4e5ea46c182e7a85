//! Transaction DTOs.

use chrono::{DateTime, Utc};
use fintrack_core::{
    parse_date_bound, Category, CategoryId, FintrackError, FintrackResult, NewTransaction,
    PageInfo, Page, TransactionDetails, TransactionId, TransactionType, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Request to record a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Id of a category owned by the caller.
    pub category: CategoryId,

    #[schema(value_type = f64)]
    pub amount: Decimal,

    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[validate(custom(function = "valid_date", message = "Invalid date"))]
    pub date: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: String,
}

fn valid_date(value: &str) -> Result<(), ValidationError> {
    parse_date_bound(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date"))
}

impl CreateTransactionRequest {
    /// Converts the request into an engine input owned by `user_id`.
    pub fn into_new_transaction(self, user_id: UserId) -> FintrackResult<NewTransaction> {
        let date = parse_date_bound(&self.date)
            .ok_or_else(|| FintrackError::validation(format!("date: Invalid date '{}'", self.date)))?;

        Ok(NewTransaction {
            user_id,
            transaction_type: self.transaction_type,
            category_id: self.category,
            amount: self.amount,
            date,
            description: self.description,
        })
    }
}

/// Category as embedded in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub user: UserId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            user: category.user_id,
            name: category.name,
        }
    }
}

/// Transaction response DTO with its category resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub user: UserId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: CategoryResponse,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionDetails> for TransactionResponse {
    fn from(details: TransactionDetails) -> Self {
        let TransactionDetails {
            transaction,
            category,
        } = details;
        Self {
            id: transaction.id,
            user: transaction.user_id,
            transaction_type: transaction.transaction_type,
            category: category.into(),
            amount: transaction.amount,
            date: transaction.date,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

/// One page of transactions plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub pagination: PageInfo,
}

impl From<Page<TransactionDetails>> for TransactionListResponse {
    fn from(page: Page<TransactionDetails>) -> Self {
        let page = page.map(TransactionResponse::from);
        Self {
            transactions: page.content,
            pagination: page.info,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fintrack_core::{PageRequest, ValidateExt};

    fn request(date: &str) -> CreateTransactionRequest {
        serde_json::from_value(serde_json::json!({
            "type": "expense",
            "category": CategoryId::new(),
            "amount": 50,
            "date": date,
            "description": "Groceries"
        }))
        .unwrap()
    }

    #[test]
    fn test_request_accepts_date_only() {
        let user = UserId::new();
        let input = request("2024-01-01").into_new_transaction(user).unwrap();
        assert_eq!(input.user_id, user);
        assert_eq!(input.amount, Decimal::from(50));
        assert_eq!(input.date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_request_rejects_bad_date() {
        let req = request("01/02/2024");
        let err = req.validate_request().unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
        assert!(req.into_new_transaction(UserId::new()).is_err());
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let req: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "type": "income",
            "category": CategoryId::new(),
            "amount": 12.5,
            "date": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert!(req.description.is_empty());
        assert!(req.validate_request().is_ok());
    }

    #[test]
    fn test_transaction_response_shape() {
        let user = UserId::new();
        let category = Category::new(user, "Rent");
        let transaction = NewTransaction {
            user_id: user,
            transaction_type: TransactionType::Expense,
            category_id: category.id,
            amount: Decimal::new(120_050, 2),
            date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            description: "February".to_string(),
        }
        .into_transaction();

        let response = TransactionResponse::from(TransactionDetails {
            transaction,
            category,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["type"], "expense");
        assert_eq!(json["user"], user.to_string());
        assert_eq!(json["category"]["name"], "Rent");
        assert_eq!(json["category"]["user"], user.to_string());
        assert_eq!(json["amount"], serde_json::json!(1200.5));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_list_response_carries_pagination() {
        let page: Page<TransactionDetails> = Page::new(Vec::new(), PageRequest::new(3, 10), 15);
        let response = TransactionListResponse::from(page);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["transactions"], serde_json::json!([]));
        assert_eq!(
            json["pagination"],
            serde_json::json!({ "total": 15, "page": 3, "limit": 10, "totalPages": 2 })
        );
    }
}
