//! simple_banking - account and transaction REST service
//!
//! Accounts, signed transactions and idempotent transaction creation on an
//! embedded SQLite store.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simple_banking::api::{self, AppState};
use simple_banking::idempotency::IdempotencyStore;
use simple_banking::jobs::{JobScheduler, JobSchedulerConfig};
use simple_banking::{db, Config};

/// Initialize tracing/logging. Production logs are emitted as JSON.
fn init_tracing(json: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple_banking=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = %config.environment, "Starting simple_banking server");
    tracing::info!(path = %config.database_path.display(), "Opening database...");

    let pool = db::connect(&config.database_path, config.database_max_connections).await?;

    // Migrate, seed and verify schema
    db::prepare(&pool).await?;

    tracing::info!("Database ready");

    let idempotency = IdempotencyStore::new(config.idempotency());
    if config.idempotency_ttl.is_none() {
        tracing::warn!(
            "IDEMPOTENCY_TTL_SECS not set, completed idempotency records are kept \
             for the process lifetime"
        );
    }

    let scheduler = JobScheduler::with_config(
        pool.clone(),
        idempotency.clone(),
        JobSchedulerConfig {
            idempotency_sweep_interval: config.idempotency_sweep_interval,
            ..JobSchedulerConfig::default()
        },
    )
    .start();

    let state = AppState::new(pool.clone(), idempotency);
    let app = api::create_app(state, config.request_timeout);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    scheduler.abort();
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
