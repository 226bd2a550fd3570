//! Idempotency module
//!
//! Prevents duplicate request processing using idempotency keys.

mod store;

pub use store::{
    Acquired, CachedResponse, ClaimGuard, IdempotencyConfig, IdempotencyError, IdempotencyStore,
    KeyState,
};
