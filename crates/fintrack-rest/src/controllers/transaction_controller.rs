//! Transaction controller.

use crate::{
    extractors::{AuthenticatedUser, ListTransactionsQuery, StatsQuery, ValidatedJson},
    responses::{created, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use fintrack_core::{DateRange, ErrorResponse, FintrackError, TransactionId, TransactionStats};
use fintrack_service::{
    CreateTransactionRequest, MessageResponse, TransactionListResponse, TransactionResponse,
};
use tracing::debug;

/// Creates the transaction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/stats", get(get_stats))
        .route("/:id", delete(delete_transaction))
}

/// List the caller's transactions.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    params(ListTransactionsQuery),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionListResponse),
        (status = 401, description = "Missing or invalid user identity", body = ErrorResponse)
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<TransactionListResponse> {
    let spec = query.into_spec(user.user_id());
    debug!(user_id = %spec.user_id, page = spec.page.page, "List transactions request");

    let response = state.transaction_service.list_transactions(spec).await?;
    ok(response)
}

/// Record a transaction.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 400, description = "Invalid category or request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid user identity", body = ErrorResponse)
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    debug!("Create transaction request for user: {}", user.user_id());

    let response = state
        .transaction_service
        .create_transaction(user.user_id(), request)
        .await?;
    Ok(created(response))
}

/// Delete one of the caller's transactions.
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid user identity", body = ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    debug!("Delete transaction request: {}", id);

    let transaction_id = parse_transaction_id(&id)?;
    state
        .transaction_service
        .delete_transaction(user.user_id(), transaction_id)
        .await?;

    ok(MessageResponse::new("Transaction deleted"))
}

/// Income and expense totals for the caller.
#[utoipa::path(
    get,
    path = "/transactions/stats",
    tag = "transactions",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregate statistics", body = TransactionStats),
        (status = 401, description = "Missing or invalid user identity", body = ErrorResponse)
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> ApiResult<TransactionStats> {
    debug!("Stats request for user: {}", user.user_id());

    let stats = state
        .transaction_service
        .get_stats(user.user_id(), DateRange::from(query))
        .await?;
    ok(stats)
}

/// Helper to parse a transaction ID from a path parameter.
fn parse_transaction_id(id: &str) -> Result<TransactionId, AppError> {
    TransactionId::parse(id).map_err(|_| {
        AppError(FintrackError::Validation(format!("Invalid transaction ID: {}", id)))
    })
}
