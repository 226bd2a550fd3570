//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Pagination, PaginationMetadata, Transaction};

// =========================================================================
// CreateAccountCommand
// =========================================================================

/// Command to open a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub document_number: String,
}

impl CreateAccountCommand {
    pub fn new(document_number: impl Into<String>) -> Self {
        Self {
            document_number: document_number.into(),
        }
    }
}

// =========================================================================
// CreateTransactionCommand
// =========================================================================

/// Command to record a transaction against an account.
///
/// The amount's sign is ignored; it is derived from the operation type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionCommand {
    pub account_id: i64,
    pub operation_type_id: i64,
    pub amount: Decimal,
}

impl CreateTransactionCommand {
    pub fn new(account_id: i64, operation_type_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            operation_type_id,
            amount,
        }
    }
}

// =========================================================================
// ListTransactionsQuery
// =========================================================================

/// Query for one page of an account's transactions
#[derive(Debug, Clone, Copy)]
pub struct ListTransactionsQuery {
    pub account_id: i64,
    pub pagination: Pagination,
}

impl ListTransactionsQuery {
    pub fn new(account_id: i64, pagination: Pagination) -> Self {
        Self {
            account_id,
            pagination,
        }
    }
}

/// A page of transactions with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationMetadata,
}
