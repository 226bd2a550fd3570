//! Account Repository (SQLite)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::{Account, DocumentNumber};

use super::{AccountRepository, RepositoryError};

type AccountRow = (i64, String, DateTime<Utc>);

fn into_account((id, document_number, created_at): AccountRow) -> Account {
    Account {
        id,
        document_number,
        created_at,
    }
}

/// SQLite-backed account storage
#[derive(Debug, Clone)]
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, document_number: &DocumentNumber) -> Result<Account, RepositoryError> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (document_number, created_at)
            VALUES (?1, ?2)
            RETURNING id, document_number, created_at
            "#,
        )
        .bind(document_number.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_insert)?;

        Ok(into_account(row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, document_number, created_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_account))
    }

    async fn find_by_document_number(
        &self,
        document_number: &str,
    ) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, document_number, created_at
            FROM accounts
            WHERE document_number = ?1
            "#,
        )
        .bind(document_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_account))
    }
}
