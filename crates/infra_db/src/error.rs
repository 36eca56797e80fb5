//! Database error types
//!
//! `sqlx` errors are classified once, here, by PostgreSQL SQLSTATE so the
//! adapters only ever match on [`DatabaseError`].

use thiserror::Error;

/// Unique constraint violated
const UNIQUE_VIOLATION: &str = "23505";
/// NOT NULL constraint violated
const NOT_NULL_VIOLATION: &str = "23502";
/// CHECK constraint violated
const CHECK_VIOLATION: &str = "23514";
/// Value does not fit the column type, e.g. an amount beyond `NUMERIC(12, 2)`
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// No pooled connection became free within the acquire timeout
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A query that must return a row returned none
    #[error("Row not found")]
    RowNotFound,

    /// Unique constraint violation, e.g. a second bill for one appointment
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Schema setup failed: {0}")]
    MigrationFailed(String),
}

impl DatabaseError {
    /// Returns true if the database could not be reached at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::RowNotFound,
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                classify_sqlstate(db_err.code().as_deref(), db_err.message().to_string())
            }
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

/// Maps a PostgreSQL SQLSTATE to the error the adapters act on
fn classify_sqlstate(code: Option<&str>, message: String) -> DatabaseError {
    match code {
        Some(UNIQUE_VIOLATION) => DatabaseError::DuplicateEntry(message),
        Some(NOT_NULL_VIOLATION | CHECK_VIOLATION | NUMERIC_VALUE_OUT_OF_RANGE) => {
            DatabaseError::ConstraintViolation(message)
        }
        _ => DatabaseError::QueryFailed(message),
    }
}
