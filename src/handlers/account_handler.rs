//! Account Handlers
//!
//! Account creation and lookup.

use std::sync::Arc;

use crate::domain::{Account, DocumentNumber, DomainError, OperationContext};
use crate::error::AppError;
use crate::repository::{AccountRepository, RepositoryError};

use super::CreateAccountCommand;

// =========================================================================
// CreateAccountHandler
// =========================================================================

/// Handler for account creation
pub struct CreateAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl CreateAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Execute the create account command
    pub async fn execute(
        &self,
        command: CreateAccountCommand,
        context: &OperationContext,
    ) -> Result<Account, AppError> {
        let document_number = DocumentNumber::new(command.document_number)?;

        if self
            .accounts
            .find_by_document_number(document_number.as_str())
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateDocumentNumber(document_number.to_string()).into());
        }

        // A concurrent create can still win between the lookup and the insert
        let account = self
            .accounts
            .create(&document_number)
            .await
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => AppError::from(
                    DomainError::DuplicateDocumentNumber(document_number.to_string()),
                ),
                other => AppError::from(other),
            })?;

        tracing::info!(
            account_id = account.id,
            correlation_id = ?context.correlation_id,
            "Account created"
        );

        Ok(account)
    }
}

// =========================================================================
// GetAccountHandler
// =========================================================================

/// Handler for account lookup
pub struct GetAccountHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl GetAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, account_id: i64) -> Result<Account, AppError> {
        if account_id <= 0 {
            return Err(DomainError::InvalidAccountId.into());
        }

        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(account_id).into())
    }
}
