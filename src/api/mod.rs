//! API module
//!
//! HTTP API endpoints and middleware.

pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use routes::{create_router, health_check};
pub use state::AppState;

/// Build the full application: health check plus the API routes, served at
/// the root and under `/api/v1`.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // Layers run last-added first: correlation -> logging -> idempotency -> handler
    let api = create_router()
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::idempotency_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::correlation_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api.clone())
        .nest("/api/v1", api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
