//! Transaction Handlers
//!
//! Validates, normalizes and records transactions; lists them per account.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    validate_request, DomainError, NewTransaction, OperationContext, PaginationMetadata,
    Transaction,
};
use crate::error::AppError;
use crate::repository::{AccountRepository, OperationTypeRepository, TransactionRepository};

use super::{CreateTransactionCommand, ListTransactionsQuery, TransactionPage};

// =========================================================================
// CreateTransactionHandler
// =========================================================================

/// Handler for transaction creation
pub struct CreateTransactionHandler {
    accounts: Arc<dyn AccountRepository>,
    operation_types: Arc<dyn OperationTypeRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl CreateTransactionHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        operation_types: Arc<dyn OperationTypeRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            accounts,
            operation_types,
            transactions,
        }
    }

    /// Execute the create transaction command.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// account id, operation type, amount, account existence, then the
    /// stored operation type. Exactly one write happens on success.
    pub async fn execute(
        &self,
        command: CreateTransactionCommand,
        context: &OperationContext,
    ) -> Result<Transaction, AppError> {
        let (operation_type, amount) = validate_request(
            command.account_id,
            command.operation_type_id,
            command.amount,
        )?;

        if self.accounts.find_by_id(command.account_id).await?.is_none() {
            return Err(DomainError::AccountNotFound(command.account_id).into());
        }

        if self
            .operation_types
            .find_by_id(operation_type.id())
            .await?
            .is_none()
        {
            return Err(DomainError::InvalidOperationType(operation_type.id()).into());
        }

        let new_transaction =
            NewTransaction::normalized(command.account_id, operation_type, amount, Utc::now());

        let transaction = self.transactions.create(&new_transaction).await?;

        tracing::info!(
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            operation_type = operation_type.description(),
            amount = %transaction.amount,
            correlation_id = ?context.correlation_id,
            idempotency_key = ?context.idempotency_key,
            "Transaction created"
        );

        Ok(transaction)
    }
}

// =========================================================================
// ListTransactionsHandler
// =========================================================================

/// Handler for paged transaction listing
pub struct ListTransactionsHandler {
    accounts: Arc<dyn AccountRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl ListTransactionsHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    pub async fn execute(&self, query: ListTransactionsQuery) -> Result<TransactionPage, AppError> {
        if query.account_id <= 0 {
            return Err(DomainError::InvalidAccountId.into());
        }

        if self.accounts.find_by_id(query.account_id).await?.is_none() {
            return Err(DomainError::AccountNotFound(query.account_id).into());
        }

        let (transactions, total) = self
            .transactions
            .find_page_by_account(query.account_id, query.pagination)
            .await?;

        Ok(TransactionPage {
            transactions,
            pagination: PaginationMetadata::new(total, query.pagination),
        })
    }
}
