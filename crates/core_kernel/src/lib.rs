//! Core Kernel - Foundational types shared by the billing service crates
//!
//! This crate provides the building blocks used across the domain, database
//! and API layers:
//! - Strongly-typed identifiers for bills, patients and appointments
//! - The port error type returned by every store adapter
//! - Marker and health-check traits implemented by adapters

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{BillId, PatientId, AppointmentId, APPOINTMENT_ID_MAX_LEN};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
    OperationMetadata,
};
pub use error::CoreError;
