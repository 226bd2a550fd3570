//! Repository module
//!
//! Storage ports used by the handlers, and their SQLite adapters.

mod accounts;
mod error;
mod operation_types;
mod transactions;

use async_trait::async_trait;

use crate::domain::{
    Account, DocumentNumber, NewTransaction, OperationTypeRecord, Pagination, Transaction,
};

pub use accounts::SqliteAccountRepository;
pub use error::RepositoryError;
pub use operation_types::SqliteOperationTypeRepository;
pub use transactions::SqliteTransactionRepository;

/// Account storage port
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Returns `RepositoryError::UniqueViolation` if the document number is taken.
    async fn create(&self, document_number: &DocumentNumber) -> Result<Account, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, RepositoryError>;

    async fn find_by_document_number(
        &self,
        document_number: &str,
    ) -> Result<Option<Account>, RepositoryError>;
}

/// Operation type lookup port
#[async_trait]
pub trait OperationTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<OperationTypeRecord>, RepositoryError>;
}

/// Transaction storage port
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a normalized transaction, returning it with its assigned id.
    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, RepositoryError>;

    /// One page of an account's transactions, newest first, plus the total count.
    async fn find_page_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Transaction>, i64), RepositoryError>;
}
