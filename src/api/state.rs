//! Shared application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::idempotency::IdempotencyStore;
use crate::repository::{
    AccountRepository, OperationTypeRepository, SqliteAccountRepository,
    SqliteOperationTypeRepository, SqliteTransactionRepository, TransactionRepository,
};

/// State handed to every route and middleware
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub operation_types: Arc<dyn OperationTypeRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub idempotency: IdempotencyStore,
}

impl AppState {
    /// Wire the SQLite repositories over `pool`
    pub fn new(pool: SqlitePool, idempotency: IdempotencyStore) -> Self {
        Self {
            accounts: Arc::new(SqliteAccountRepository::new(pool.clone())),
            operation_types: Arc::new(SqliteOperationTypeRepository::new(pool.clone())),
            transactions: Arc::new(SqliteTransactionRepository::new(pool)),
            idempotency,
        }
    }
}
