//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent business rule violations. They are independent
/// of the web/infrastructure layer; the boundary maps them to HTTP statuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Account reference is not a positive identifier
    #[error("account_id must be greater than 0")]
    InvalidAccountId,

    /// Operation type reference is not one of the known types
    #[error("operation_type_id must be between 1 and 4 (got {0})")]
    InvalidOperationType(i64),

    /// Transaction amount is zero
    #[error("amount cannot be zero")]
    ZeroAmount,

    /// Document number failed format validation
    #[error("{0}")]
    InvalidDocumentNumber(String),

    /// Pagination limit out of range or malformed
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// Pagination offset out of range or malformed
    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    /// Referenced account does not exist
    #[error("account with id {0} not found")]
    AccountNotFound(i64),

    /// Another account already uses this document number
    #[error("account with document number {0} already exists")]
    DuplicateDocumentNumber(String),
}

impl DomainError {
    /// Check if this error means a referenced entity is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_))
    }

    /// Check if this is a uniqueness conflict
    pub fn is_conflict_error(&self) -> bool {
        matches!(self, Self::DuplicateDocumentNumber(_))
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAccountId => "invalid_account_id",
            Self::InvalidOperationType(_) => "invalid_operation_type",
            Self::ZeroAmount => "zero_amount",
            Self::InvalidDocumentNumber(_) => "invalid_document_number",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::InvalidOffset(_) => "invalid_offset",
            Self::AccountNotFound(_) => "account_not_found",
            Self::DuplicateDocumentNumber(_) => "duplicate_document_number",
        }
    }
}
