//! Repository Errors

/// Errors that can occur in the storage adapters
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Unique constraint violated on insert
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored row could not be mapped back into a domain value
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Map a database error, separating unique-constraint failures.
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::UniqueViolation(db_err.message().to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}
