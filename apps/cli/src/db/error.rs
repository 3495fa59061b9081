//! Database error types.

use thiserror::Error;
use zhlib_core::StoreError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl DbError {
    /// Whether this is a UNIQUE, PRIMARY KEY or FOREIGN KEY violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        if e.is_constraint_violation() {
            return StoreError::Conflict(e.to_string());
        }
        match e {
            DbError::InvalidData(msg) => StoreError::InvalidData(msg),
            DbError::Conflict(msg) => StoreError::Conflict(msg),
            DbError::Sqlite(err) => StoreError::Unavailable(err.to_string()),
        }
    }
}
