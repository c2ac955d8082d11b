//! Storage-level errors for operator commands

use thiserror::Error;

/// Errors raised outside the repository traits: connecting, migrating,
/// consolidating and running ad-hoc SQL
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

impl From<StorageError> for gymdesk_interfaces::DatabaseError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DbError(e) => crate::seaorm::errors::map_db_err("storage operation", e),
            other => gymdesk_interfaces::DatabaseError::internal(other.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
