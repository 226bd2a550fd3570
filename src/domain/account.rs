//! Account entity and document number primitive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

const MIN_DOCUMENT_LEN: usize = 11;
const MAX_DOCUMENT_LEN: usize = 14;

/// A customer account. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "account_id")]
    pub id: i64,
    pub document_number: String,
    pub created_at: DateTime<Utc>,
}

/// Validated document number.
///
/// # Invariants
/// - Non-empty
/// - Between 11 and 14 characters
/// - ASCII digits only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::InvalidDocumentNumber(
                "document_number is required".to_string(),
            ));
        }

        let len = value.chars().count();
        if !(MIN_DOCUMENT_LEN..=MAX_DOCUMENT_LEN).contains(&len) {
            return Err(DomainError::InvalidDocumentNumber(format!(
                "document_number must have between {} and {} characters",
                MIN_DOCUMENT_LEN, MAX_DOCUMENT_LEN
            )));
        }

        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidDocumentNumber(
                "document_number must contain only digits".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document_numbers() {
        assert!(DocumentNumber::new("12345678900").is_ok());
        assert!(DocumentNumber::new("12345678000195").is_ok());
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = DocumentNumber::new("").unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_document_length_bounds() {
        assert!(DocumentNumber::new("1234567890").is_err());
        assert!(DocumentNumber::new("123456789012345").is_err());
    }

    #[test]
    fn test_document_digits_only() {
        let err = DocumentNumber::new("123.456.789-00").unwrap_err();
        assert!(err.to_string().contains("only digits"));
        assert!(DocumentNumber::new("1234567890a").is_err());
    }

    #[test]
    fn test_account_serializes_with_account_id() {
        let account = Account {
            id: 1,
            document_number: "12345678900".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["account_id"], 1);
        assert_eq!(json["document_number"], "12345678900");
    }
}
