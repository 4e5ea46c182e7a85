//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, ReadinessResponse};
use fintrack_core::{
    CategoryId, ErrorResponse, FieldError, PageInfo, TransactionId, TransactionStats,
    TransactionType, TypeTotals, UserId,
};
use fintrack_service::{
    CategoryResponse, CreateTransactionRequest, MessageResponse, TransactionListResponse,
    TransactionResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Fintrack API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fintrack Transactions API",
        version = "1.0.0",
        description = "Per-user income and expense tracking with cached listings and statistics",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api", description = "Transactions API")
    ),
    paths(
        crate::controllers::transaction_controller::list_transactions,
        crate::controllers::transaction_controller::create_transaction,
        crate::controllers::transaction_controller::delete_transaction,
        crate::controllers::transaction_controller::get_stats,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            CategoryId,
            TransactionId,
            TransactionType,
            TypeTotals,
            TransactionStats,
            PageInfo,
            ErrorResponse,
            FieldError,
            CreateTransactionRequest,
            CategoryResponse,
            TransactionResponse,
            TransactionListResponse,
            MessageResponse,
            HealthResponse,
            ComponentHealth,
            ReadinessResponse,
        )
    ),
    modifiers(&UserIdentityAddon),
    tags(
        (name = "transactions", description = "Transaction listing, recording and statistics"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Documents the `X-User-Id` identity header.
struct UserIdentityAddon;

impl Modify for UserIdentityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-User-Id"))),
            );
        }
    }
}
