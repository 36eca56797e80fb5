//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillStore;
//! use domain_billing::BillService;
//! use std::sync::Arc;
//!
//! let service = BillService::new(Arc::new(PostgresBillStore::new(pool)));
//! ```

use core_kernel::PortError;

use crate::error::DatabaseError;

pub mod bills;
pub mod principals;

pub use bills::PostgresBillStore;
pub use principals::PostgresPrincipalStore;

/// Converts a database error to a port error
pub(crate) fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
        DatabaseError::ConstraintViolation(msg) => PortError::validation(msg),
        e if e.is_connection_error() => PortError::Connection {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = db_to_port_error(DatabaseError::DuplicateEntry(
            "duplicate key value violates unique constraint \"bills_appointment_id_key\"".into(),
        ));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        let err = db_to_port_error(DatabaseError::PoolExhausted);
        assert!(err.is_transient());
    }

    #[test]
    fn test_missing_row_is_internal() {
        let err = db_to_port_error(DatabaseError::RowNotFound);
        assert!(matches!(err, PortError::Internal { .. }));
    }

    #[test]
    fn test_query_failure_is_internal() {
        let err = db_to_port_error(DatabaseError::QueryFailed("syntax".into()));
        assert!(matches!(err, PortError::Internal { .. }));
    }
}
