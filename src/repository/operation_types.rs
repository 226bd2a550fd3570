//! Operation Type Repository (SQLite)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::{OperationType, OperationTypeRecord};

use super::{OperationTypeRepository, RepositoryError};

type OperationTypeRow = (i64, String, DateTime<Utc>);

fn into_record((id, description, created_at): OperationTypeRow) -> OperationTypeRecord {
    OperationTypeRecord {
        id,
        description,
        created_at,
    }
}

/// SQLite-backed operation type lookup
#[derive(Debug, Clone)]
pub struct SqliteOperationTypeRepository {
    pool: SqlitePool,
}

impl SqliteOperationTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the known operation types. Existing rows are left untouched.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for op in OperationType::ALL {
            inserted += sqlx::query(
                r#"
                INSERT OR IGNORE INTO operation_types (id, description, created_at)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(op.id())
            .bind(op.description())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        if inserted > 0 {
            tracing::info!(inserted = inserted, "Seeded operation types");
        }

        Ok(inserted)
    }
}

#[async_trait]
impl OperationTypeRepository for SqliteOperationTypeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<OperationTypeRecord>, RepositoryError> {
        let row: Option<OperationTypeRow> = sqlx::query_as(
            r#"
            SELECT id, description, created_at
            FROM operation_types
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_record))
    }
}
