//! API Middleware
//!
//! Correlation, request logging and idempotency middleware.

use axum::{
    body::{self, Body},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::idempotency::{Acquired, CachedResponse};

use super::extract::idempotency_key;
use super::state::AppState;

/// Header carrying the request correlation id
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

// =========================================================================
// Correlation Middleware
// =========================================================================

/// Build the [`OperationContext`] for the request and echo its correlation id.
///
/// A valid UUID in `X-Correlation-Id` is kept, anything else is replaced.
pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let headers = request.headers();

    let correlation_id = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let mut context = OperationContext::new().with_correlation_id(correlation_id);
    if let Some(key) = idempotency_key(headers) {
        context = context.with_idempotency_key(key);
    }

    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "proxy-authorization",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .extensions()
        .get::<OperationContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}

// =========================================================================
// Idempotency Middleware
// =========================================================================

/// Methods that are idempotent by nature and never deduplicated
fn is_naturally_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Store key for a client key: one table entry per method, route path and key.
///
/// Inside a nested router the path has its mount prefix stripped, so the same
/// route served under two prefixes shares one scope.
pub fn scoped_key(method: &Method, path: &str, key: &str) -> String {
    format!("{} {} {}", method, path, key)
}

/// Deduplicate mutating requests that carry an `Idempotency-Key`.
///
/// The first request for a key runs the handler; concurrent requests with
/// the same key wait for it. A 2xx outcome is replayed verbatim to every
/// later request, any other outcome leaves the key free for a retry.
pub async fn idempotency_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_naturally_idempotent(request.method()) {
        return next.run(request).await;
    }

    let key = match idempotency_key(request.headers()) {
        Some(key) => scoped_key(request.method(), request.uri().path(), key),
        None => return next.run(request).await,
    };

    let guard = match state.idempotency.acquire(&key).await {
        Ok(Acquired::Replay(cached)) => return cached.into_response(),
        Ok(Acquired::Owner(guard)) => guard,
        Err(e) => return AppError::from(e).into_response(),
    };

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();

    // Capture the full body before anyone is released
    let bytes = match body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // Dropping the guard frees the key
            drop(guard);
            return AppError::Internal(format!("Failed to buffer response body: {}", e))
                .into_response();
        }
    };

    guard.complete(CachedResponse::new(
        parts.status,
        parts.headers.get(header::CONTENT_TYPE).cloned(),
        bytes.clone(),
    ));

    Response::from_parts(parts, Body::from(bytes))
}
