//! Command Handlers module
//!
//! Handlers that orchestrate business operations.
//! Each handler coordinates domain validation and the storage ports.

mod account_handler;
mod commands;
mod transaction_handler;


pub use account_handler::{CreateAccountHandler, GetAccountHandler};
pub use commands::*;
pub use transaction_handler::{CreateTransactionHandler, ListTransactionsHandler};
