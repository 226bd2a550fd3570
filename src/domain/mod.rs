//! Domain module
//!
//! Core domain types and business rules.

pub mod account;
pub mod amount;
pub mod context;
pub mod error;
pub mod operation_type;
pub mod pagination;
pub mod transaction;

pub use account::{Account, DocumentNumber};
pub use amount::Amount;
pub use context::OperationContext;
pub use error::DomainError;
pub use operation_type::{Classification, OperationType, OperationTypeRecord};
pub use pagination::{Pagination, PaginationMetadata};
pub use transaction::{validate_request, NewTransaction, Transaction};
