//! Storage error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    /// A unique column (username, email) already holds the value
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// A stored row could not be mapped back into a domain type
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Map unique-constraint violations to `Duplicate`, everything else to `Database`
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(db.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}
