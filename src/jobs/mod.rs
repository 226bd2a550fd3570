//! Scheduled Jobs
//!
//! Background jobs for periodic maintenance tasks.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::time::interval;

use crate::db;
use crate::idempotency::IdempotencyStore;

// =========================================================================
// Expired Idempotency Record Purge
// =========================================================================

/// Drop completed idempotency records past their TTL.
/// A no-op when no TTL is configured.
pub fn purge_expired_idempotency_records(store: &IdempotencyStore) -> usize {
    let purged = store.purge_expired();

    if purged > 0 {
        tracing::info!(
            purged = purged,
            remaining = store.len(),
            "Purged expired idempotency records"
        );
    }

    purged
}

// =========================================================================
// Database Health Check
// =========================================================================

/// Verify the database still answers
pub async fn check_database(pool: &SqlitePool) -> Result<(), JobError> {
    db::verify_connection(pool).await?;
    Ok(())
}

// =========================================================================
// Job Scheduler
// =========================================================================

/// Configuration for job scheduler
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Interval for idempotency record purge (default: 1 minute)
    pub idempotency_sweep_interval: Duration,
    /// Interval for database health check (default: 5 minutes)
    pub database_check_interval: Duration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            idempotency_sweep_interval: Duration::from_secs(60),
            database_check_interval: Duration::from_secs(300),
        }
    }
}

/// Job Scheduler - runs periodic maintenance tasks
pub struct JobScheduler {
    pool: SqlitePool,
    idempotency: IdempotencyStore,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    /// Create a new job scheduler
    pub fn with_config(
        pool: SqlitePool,
        idempotency: IdempotencyStore,
        config: JobSchedulerConfig,
    ) -> Self {
        Self {
            pool,
            idempotency,
            config,
        }
    }

    /// Start the job scheduler in the background
    /// Returns a handle that can be used to abort the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!(
            sweep_interval_secs = self.config.idempotency_sweep_interval.as_secs(),
            ttl = ?self.idempotency.config().ttl,
            "Job scheduler started"
        );

        let mut sweep_interval = interval(self.config.idempotency_sweep_interval);
        let mut database_interval = interval(self.config.database_check_interval);

        loop {
            tokio::select! {
                _ = sweep_interval.tick() => {
                    purge_expired_idempotency_records(&self.idempotency);
                }
                _ = database_interval.tick() => {
                    if let Err(e) = check_database(&self.pool).await {
                        tracing::error!(error = %e, "Database health check failed");
                    }
                }
            }
        }
    }

    /// Run all maintenance jobs once (for manual trigger or testing)
    pub async fn run_all_once(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport {
            idempotency_records_purged: purge_expired_idempotency_records(&self.idempotency),
            ..MaintenanceReport::default()
        };

        match check_database(&self.pool).await {
            Ok(()) => report.database_ok = true,
            Err(e) => report.errors.push(format!("Database check: {}", e)),
        }

        report.completed_at = Utc::now();
        report
    }
}

/// Report from running maintenance jobs
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub idempotency_records_purged: usize,
    pub database_ok: bool,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Job execution errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =========================================================================
// Tests
// =========================================================================
