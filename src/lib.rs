//! simple_banking Library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod idempotency;
pub mod jobs;
pub mod repository;

mod error;

pub use config::Config;
pub use domain::{Amount, DomainError, OperationContext, OperationType};
pub use error::{AppError, AppResult, ErrorResponse};
