//! Idempotent schema creation
//!
//! The service creates its own tables on startup. Every statement is
//! `IF NOT EXISTS` (or guarded), so running it against an initialised
//! database is a no-op.

use tracing::info;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// DDL for the `bills` and `users` tables
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_billing_schema.sql");

/// Creates the schema if it is absent
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if any statement fails.
pub async fn ensure_schema(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Creating database tables...");

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    info!("Database tables created successfully");
    Ok(())
}
