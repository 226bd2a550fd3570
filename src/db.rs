//! Database module
//!
//! Connection setup, migrations, seeding and schema verification.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::domain::OperationType;
use crate::repository::{RepositoryError, SqliteOperationTypeRepository};

/// Database setup errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Seeding error: {0}")]
    Seed(#[from] RepositoryError),

    #[error("Database schema is not complete")]
    IncompleteSchema,
}

/// Open a connection pool on the SQLite file at `path`, creating the file
/// and its parent directory if needed.
pub async fn connect(path: &Path, max_connections: u32) -> Result<SqlitePool, DbError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        // Readers proceed while the single writer holds the lock
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Apply embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Migrate, seed operation types and verify the schema
pub async fn prepare(pool: &SqlitePool) -> Result<(), DbError> {
    run_migrations(pool).await?;
    SqliteOperationTypeRepository::new(pool.clone()).seed().await?;

    if !check_schema(pool).await? {
        return Err(DbError::IncompleteSchema);
    }
    Ok(())
}

/// Simple connectivity check
pub async fn verify_connection(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist and operation types are seeded
pub async fn check_schema(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let required_tables = ["operation_types", "accounts", "transactions"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    let seeded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operation_types")
        .fetch_one(pool)
        .await?;

    if seeded < OperationType::ALL.len() as i64 {
        tracing::error!(
            found = seeded,
            expected = OperationType::ALL.len(),
            "Operation types are not seeded"
        );
        return Ok(false);
    }

    Ok(true)
}
