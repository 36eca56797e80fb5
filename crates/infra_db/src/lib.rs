//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the billing service
//! using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern:
//!
//! - **Repositories** own the SQL and map rows to plain row structs
//! - **Adapters** implement the domain ports (`BillStore`, `PrincipalStore`)
//!   on top of the repositories and translate errors into `PortError`
//! - **Schema** creates tables and types idempotently at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, ensure_schema, DatabaseConfig};
//! use infra_db::adapters::PostgresBillStore;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/billing")).await?;
//! ensure_schema(&pool).await?;
//! let store = PostgresBillStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use schema::{ensure_schema, SCHEMA_SQL};
pub use adapters::{PostgresBillStore, PostgresPrincipalStore};
