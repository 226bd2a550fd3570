//! Operation types
//!
//! The closed set of transaction operation types and their debit/credit
//! classification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Whether an operation moves money out of (debit) or into (credit) an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Debit,
    Credit,
}

impl Classification {
    /// Apply this classification's sign to the magnitude of `amount`.
    ///
    /// The sign of the input is discarded.
    pub fn apply(self, amount: Decimal) -> Decimal {
        let magnitude = amount.abs();
        match self {
            Classification::Debit => -magnitude,
            Classification::Credit => magnitude,
        }
    }
}

/// Known operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Purchase,
    PurchaseWithInstallments,
    Withdrawal,
    CreditVoucher,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Purchase,
        OperationType::PurchaseWithInstallments,
        OperationType::Withdrawal,
        OperationType::CreditVoucher,
    ];

    /// Persistent identifier of this operation type
    pub fn id(self) -> i64 {
        match self {
            OperationType::Purchase => 1,
            OperationType::PurchaseWithInstallments => 2,
            OperationType::Withdrawal => 3,
            OperationType::CreditVoucher => 4,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }

    /// Seeded description
    pub fn description(self) -> &'static str {
        match self {
            OperationType::Purchase => "Normal Purchase",
            OperationType::PurchaseWithInstallments => "Purchase with installments",
            OperationType::Withdrawal => "Withdrawal",
            OperationType::CreditVoucher => "Credit Voucher",
        }
    }

    pub fn classification(self) -> Classification {
        match self {
            OperationType::Purchase
            | OperationType::PurchaseWithInstallments
            | OperationType::Withdrawal => Classification::Debit,
            OperationType::CreditVoucher => Classification::Credit,
        }
    }

    pub fn is_debit(self) -> bool {
        self.classification() == Classification::Debit
    }

    pub fn is_credit(self) -> bool {
        self.classification() == Classification::Credit
    }
}

impl TryFrom<i64> for OperationType {
    type Error = DomainError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        OperationType::from_id(id).ok_or(DomainError::InvalidOperationType(id))
    }
}

/// Operation type row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationTypeRecord {
    #[serde(rename = "operation_type_id")]
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
