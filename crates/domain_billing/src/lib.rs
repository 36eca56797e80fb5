//! Billing Domain - Appointment Bills
//!
//! This crate holds the business rules of the billing service:
//!
//! - **Bill**: one billing record per appointment, created PENDING with an
//!   immutable taxed amount
//! - **Fees**: consultation plus medication fees, taxed at a flat 5% and
//!   rounded half-up to two decimal places
//! - **Queries**: AND-combined filters with validated page/page-size
//! - **BillStore**: the persistence port, implemented by `infra_db` and by
//!   the in-memory store used in tests
//! - **BillService**: create-with-uniqueness-check, list and lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillService, CreateBillRequest};
//! use rust_decimal_macros::dec;
//!
//! let service = BillService::new(store);
//! let bill = service.create_bill(CreateBillRequest {
//!     patient_id: PatientId::new(1),
//!     appointment_id: AppointmentId::new("APT-101"),
//!     consultation_fee: dec!(1000.0),
//!     medication_fee: dec!(500.0),
//! }, None).await?;
//!
//! assert_eq!(bill.amount, dec!(1575.00));
//! ```

pub mod bill;
pub mod fees;
pub mod query;
pub mod ports;
pub mod service;
pub mod error;

pub use bill::{Bill, BillStatus, NewBill};
pub use fees::{BillFees, MAX_AMOUNT, TAX_RATE, round_amount};
pub use query::{BillFilter, BillPage, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use ports::BillStore;
pub use service::{BillService, CreateBillRequest};
pub use error::BillingError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryBillStore;
