//! Repository implementations
//!
//! Repositories encapsulate the SQL for each table and map between
//! database rows and plain row structs. They know nothing about domain
//! types; the adapters handle that translation.
//!
//! - Runtime-checked queries (`query_as` + `FromRow`) so builds need no
//!   live database
//! - Batch writes run inside a single transaction

pub mod bills;
pub mod users;

pub use bills::BillRepository;
pub use users::UserRepository;
