//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Message returned when a transaction references a category the caller does not own.
pub const INVALID_CATEGORY_MESSAGE: &str = "Invalid category or category not found";

/// Unified error type for all layers of Fintrack.
#[derive(Error, Debug)]
pub enum FintrackError {
    // ============ Domain Errors ============
    /// Resource not found (or not owned by the caller)
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// A referenced entity is missing or belongs to someone else
    #[error("{0}")]
    InvalidReference(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Identity Errors ============
    /// Caller identity missing or unreadable
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Persistent store could not be reached
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FintrackError {
    /// Returns the HTTP status code for this error.
    ///
    /// Persistent-store failures are reported as plain client errors; callers
    /// are not told whether a retry could help.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidReference(_)
            | Self::Validation(_)
            | Self::Database(_)
            | Self::BackendUnavailable(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to hand back to API clients.
    ///
    /// `NotFound` drops the id so that a caller probing another user's
    /// records learns nothing beyond "not found".
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { resource_type, .. } => format!("{resource_type} not found"),
            Self::InvalidReference(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates the error raised when a category reference does not resolve for the owner.
    #[must_use]
    pub fn invalid_category() -> Self {
        Self::InvalidReference(INVALID_CATEGORY_MESSAGE.to_string())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::BackendUnavailable(_) | Self::Cache(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for FintrackError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::BackendUnavailable(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FintrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error body from a `FintrackError`.
    #[must_use]
    pub fn from_error(error: &FintrackError) -> Self {
        Self {
            error: error.public_message(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&FintrackError> for ErrorResponse {
    fn from(error: &FintrackError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(FintrackError::not_found("Transaction", 1).status_code(), 404);
        assert_eq!(FintrackError::invalid_category().status_code(), 400);
        assert_eq!(FintrackError::validation("bad amount").status_code(), 400);
        assert_eq!(FintrackError::unauthorized("no user").status_code(), 401);
        assert_eq!(FintrackError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_store_failures_are_client_errors() {
        assert_eq!(FintrackError::Database("syntax".to_string()).status_code(), 400);
        assert_eq!(
            FintrackError::BackendUnavailable("refused".to_string()).status_code(),
            400
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FintrackError::not_found("Transaction", 1).error_code(), "NOT_FOUND");
        assert_eq!(FintrackError::invalid_category().error_code(), "INVALID_REFERENCE");
        assert_eq!(FintrackError::cache("down").error_code(), "CACHE_ERROR");
        assert_eq!(FintrackError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_public_messages() {
        assert_eq!(
            FintrackError::not_found("Transaction", "abc").public_message(),
            "Transaction not found"
        );
        assert_eq!(
            FintrackError::invalid_category().public_message(),
            INVALID_CATEGORY_MESSAGE
        );
        assert!(FintrackError::validation("amount: required")
            .public_message()
            .contains("amount: required"));
    }

    #[test]
    fn test_retriable_errors() {
        assert!(FintrackError::Database("connection lost".to_string()).is_retriable());
        assert!(FintrackError::cache("timeout").is_retriable());
        assert!(!FintrackError::not_found("Transaction", 1).is_retriable());
        assert!(!FintrackError::invalid_category().is_retriable());
    }

    #[test]
    fn test_error_response_body() {
        let err = FintrackError::not_found("Transaction", 7);
        let body = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Transaction not found" }));
    }

    #[test]
    fn test_error_response_with_details() {
        let err = FintrackError::validation("bad input");
        let details = vec![FieldError {
            field: "amount".to_string(),
            message: "must be positive".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
