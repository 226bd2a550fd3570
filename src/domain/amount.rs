//! Amount type
//!
//! Domain primitive for transaction amounts. An `Amount` is validated at
//! construction time, so a zero amount cannot exist past the boundary.
//! Its sign is not meaningful until it has been normalized against an
//! operation type.

use rust_decimal::Decimal;
use std::fmt;

use super::{DomainError, OperationType};

/// Amount represents a non-zero monetary value as submitted by a client.
///
/// # Invariants
/// - Value is never zero
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use simple_banking::domain::{Amount, OperationType};
///
/// let amount = Amount::new(Decimal::new(50, 0)).unwrap();
/// assert_eq!(amount.normalize(OperationType::Purchase), Decimal::new(-50, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(Decimal);

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `DomainError::ZeroAmount` if value == 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_zero() {
            return Err(DomainError::ZeroAmount);
        }
        Ok(Self(value))
    }

    /// Get the value exactly as submitted.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Absolute value of the amount.
    pub fn magnitude(&self) -> Decimal {
        self.0.abs()
    }

    /// Canonical signed amount for the given operation type.
    ///
    /// Debit types yield `-|amount|`, the credit type yields `+|amount|`.
    pub fn normalize(&self, operation_type: OperationType) -> Decimal {
        operation_type.classification().apply(self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
