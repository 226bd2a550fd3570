//! Transaction Repository (SQLite)
//!
//! Amounts are stored as exact decimal text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::domain::{NewTransaction, Pagination, Transaction};

use super::{RepositoryError, TransactionRepository};

type TransactionRow = (i64, i64, i64, String, DateTime<Utc>);

fn into_transaction(
    (id, account_id, operation_type_id, amount, event_date): TransactionRow,
) -> Result<Transaction, RepositoryError> {
    let amount = Decimal::from_str(&amount).map_err(|e| {
        RepositoryError::CorruptRow(format!("transaction {} amount '{}': {}", id, amount, e))
    })?;

    Ok(Transaction {
        id,
        account_id,
        operation_type_id,
        amount,
        event_date,
    })
}

/// SQLite-backed transaction storage
#[derive(Debug, Clone)]
pub struct SqliteTransactionRepository {
    pool: SqlitePool,
}

impl SqliteTransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionRepository {
    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, RepositoryError> {
        let row: TransactionRow = sqlx::query_as(
            r#"
            INSERT INTO transactions (account_id, operation_type_id, amount, event_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, account_id, operation_type_id, amount, event_date
            "#,
        )
        .bind(transaction.account_id())
        .bind(transaction.operation_type().id())
        .bind(transaction.amount().to_string())
        .bind(transaction.event_date())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        into_transaction(row)
    }

    async fn find_page_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Transaction>, i64), RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM transactions WHERE account_id = ?1
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, operation_type_id, amount, event_date
            FROM transactions
            WHERE account_id = ?1
            ORDER BY event_date DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(account_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let transactions = rows
            .into_iter()
            .map(into_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((transactions, total))
    }
}
