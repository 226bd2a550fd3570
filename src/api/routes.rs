//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Account, DomainError, OperationContext, Pagination, Transaction};
use crate::error::AppError;
use crate::handlers::{
    CreateAccountCommand, CreateAccountHandler, CreateTransactionCommand,
    CreateTransactionHandler, GetAccountHandler, ListTransactionsHandler, ListTransactionsQuery,
    TransactionPage,
};

use super::extract::{ApiJson, IdempotencyKey};
use super::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub document_number: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub account_id: i64,
    pub operation_type_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Raw pagination query; parsed by the domain so bad values get domain errors
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/:account_id", get(get_account))
        .route("/accounts/:account_id/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
}

/// Parse an account id path segment. Non-numeric and non-positive ids are rejected.
fn parse_account_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DomainError::InvalidAccountId.into()),
    }
}

// =========================================================================
// GET /health
// =========================================================================

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

// =========================================================================
// POST /accounts
// =========================================================================

/// Create a new account
async fn create_account(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let handler = CreateAccountHandler::new(state.accounts);

    let account = handler
        .execute(CreateAccountCommand::new(request.document_number), &context)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

// =========================================================================
// GET /accounts/:account_id
// =========================================================================

/// Get account by ID
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account_id = parse_account_id(&account_id)?;

    let account = GetAccountHandler::new(state.accounts)
        .execute(account_id)
        .await?;

    Ok(Json(account))
}

// =========================================================================
// GET /accounts/:account_id/transactions
// =========================================================================

/// List an account's transactions, newest first
async fn list_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<TransactionPage>, AppError> {
    let account_id = parse_account_id(&account_id)?;
    let pagination = Pagination::from_query(params.limit.as_deref(), params.offset.as_deref())?;

    let page = ListTransactionsHandler::new(state.accounts, state.transactions)
        .execute(ListTransactionsQuery::new(account_id, pagination))
        .await?;

    Ok(Json(page))
}

// =========================================================================
// POST /transactions
// =========================================================================

/// Record a transaction. Requires an `Idempotency-Key` header.
async fn create_transaction(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    _key: IdempotencyKey,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let handler = CreateTransactionHandler::new(
        state.accounts,
        state.operation_types,
        state.transactions,
    );

    let command = CreateTransactionCommand::new(
        request.account_id,
        request.operation_type_id,
        request.amount,
    );

    let transaction = handler.execute(command, &context).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_id() {
        assert_eq!(parse_account_id("42").unwrap(), 42);
        for raw in ["0", "-1", "abc", "1.5", ""] {
            assert!(
                matches!(
                    parse_account_id(raw),
                    Err(AppError::Domain(DomainError::InvalidAccountId))
                ),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_transaction_request_accepts_numeric_amount() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"account_id": 1, "operation_type_id": 4, "amount": 123.45}"#,
        )
        .unwrap();
        assert_eq!(request.amount, Decimal::new(12345, 2));
    }
}
