//! Request extractors

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;

/// Header carrying the client-supplied idempotency key
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// JSON body extractor whose rejections use the standard error body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Non-empty `Idempotency-Key` header, required by the route that takes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyKey(pub String);

/// Read the idempotency key from headers. Blank values count as absent.
pub fn idempotency_key(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        idempotency_key(&parts.headers)
            .map(|key| IdempotencyKey(key.to_owned()))
            .ok_or_else(|| AppError::MissingHeader(IDEMPOTENCY_KEY_HEADER.to_string()))
    }
}
