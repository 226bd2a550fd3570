//! Transaction entity and validation rules

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, DomainError, OperationType};

/// A persisted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "transaction_id")]
    pub id: i64,
    pub account_id: i64,
    pub operation_type_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

/// A normalized transaction ready to be persisted.
///
/// Only obtainable through [`NewTransaction::normalized`], so the amount
/// sign always matches the operation type's classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    account_id: i64,
    operation_type: OperationType,
    amount: Decimal,
    event_date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn normalized(
        account_id: i64,
        operation_type: OperationType,
        amount: Amount,
        event_date: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            operation_type,
            amount: amount.normalize(operation_type),
            event_date,
        }
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn event_date(&self) -> DateTime<Utc> {
        self.event_date
    }
}

/// Input checks that need no storage round-trip.
///
/// Checked in order, first failure wins:
/// 1. account id is positive
/// 2. operation type id is a known type
/// 3. amount is non-zero
pub fn validate_request(
    account_id: i64,
    operation_type_id: i64,
    amount: Decimal,
) -> Result<(OperationType, Amount), DomainError> {
    if account_id <= 0 {
        return Err(DomainError::InvalidAccountId);
    }
    let operation_type = OperationType::try_from(operation_type_id)?;
    let amount = Amount::new(amount)?;
    Ok((operation_type, amount))
}
