//! Startup seeding
//!
//! Runs once at startup and only touches empty tables, so restarting the
//! service never duplicates data:
//!
//! - default principals when no user exists
//! - historical bills from a CSV file when no bill exists and the file is
//!   present

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use core_kernel::{AppointmentId, BillId, PatientId, PortError};
use domain_billing::{round_amount, BillStatus, BillStore, NewBill, MAX_AMOUNT};
use domain_identity::{AuthGate, IdentityError, NewUserAccount};

/// Accounts created on first start
pub const DEFAULT_PRINCIPALS: [(&str, &str); 2] =
    [("admin", "admin123"), ("billing_user", "billing123")];

const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Seeding errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] PortError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid bill on line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

/// Outcome of a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub principals: u64,
    pub bills: u64,
}

/// Seeds principals, then bills
pub async fn seed_database(
    gate: &AuthGate,
    bill_store: &dyn BillStore,
    bills_csv: Option<&Path>,
) -> Result<SeedReport, SeedError> {
    info!("Starting database seeding...");
    let principals = seed_principals(gate).await?;
    let bills = match bills_csv {
        Some(path) => seed_bills_from_csv(bill_store, path).await?,
        None => 0,
    };
    info!(principals, bills, "Database seeding completed");
    Ok(SeedReport { principals, bills })
}

/// Creates the default accounts if the account store is empty
pub async fn seed_principals(gate: &AuthGate) -> Result<u64, SeedError> {
    if gate.store().count().await? > 0 {
        info!("Users already exist, skipping user seeding");
        return Ok(0);
    }

    let hasher = gate.hasher();
    let accounts = DEFAULT_PRINCIPALS
        .iter()
        .map(|(username, password)| {
            Ok(NewUserAccount {
                username: username.to_string(),
                password_hash: hasher.hash(password)?,
            })
        })
        .collect::<Result<Vec<_>, IdentityError>>()?;

    let seeded = gate.store().insert_all(accounts).await?;
    info!(count = seeded, "Seeded users successfully");
    Ok(seeded)
}

/// Imports historical bills if the bill store is empty and the file exists
pub async fn seed_bills_from_csv(store: &dyn BillStore, path: &Path) -> Result<u64, SeedError> {
    if store.count().await? > 0 {
        info!("Bills already exist, skipping bill seeding");
        return Ok(0);
    }

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "CSV file not readable, skipping bill seeding");
            return Ok(0);
        }
    };

    info!(path = %path.display(), "Loading bills from CSV");
    let bills = parse_bills_csv(file)?;
    let seeded = store.import(bills).await?;
    info!(count = seeded, "Seeded bills from CSV successfully");
    Ok(seeded)
}

#[derive(Debug, Deserialize)]
struct CsvBill {
    bill_id: i64,
    patient_id: i64,
    appointment_id: String,
    amount: String,
    status: String,
    created_at: String,
}

/// Parses the historical bill export
///
/// Status mapping: `OPEN` becomes PENDING, `VOID` becomes CANCELLED and
/// anything else is PAID. Timestamps are `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn parse_bills_csv<R: Read>(reader: R) -> Result<Vec<NewBill>, SeedError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bills = Vec::new();

    for record in reader.deserialize::<CsvBill>() {
        let row = record?;
        // header is line 1
        let line = bills.len() as u64 + 2;
        let invalid = |message: String| SeedError::InvalidRow { line, message };

        let appointment_id =
            AppointmentId::parse(row.appointment_id).map_err(|e| invalid(e.to_string()))?;
        let amount: Decimal = row
            .amount
            .parse()
            .map_err(|e| invalid(format!("amount '{}': {}", row.amount, e)))?;
        if amount.is_sign_negative() {
            return Err(invalid(format!("negative amount {}", amount)));
        }
        let amount = round_amount(amount);
        if amount > MAX_AMOUNT {
            return Err(invalid(format!("amount {} exceeds {}", amount, MAX_AMOUNT)));
        }
        let created_at = NaiveDateTime::parse_from_str(&row.created_at, CSV_TIMESTAMP_FORMAT)
            .map_err(|e| invalid(format!("created_at '{}': {}", row.created_at, e)))?
            .and_utc();

        bills.push(NewBill {
            bill_id: Some(BillId::new(row.bill_id)),
            patient_id: PatientId::new(row.patient_id),
            appointment_id,
            amount,
            status: map_csv_status(&row.status),
            created_at: Some(created_at),
        });
    }

    Ok(bills)
}

fn map_csv_status(status: &str) -> BillStatus {
    match status.trim().to_ascii_uppercase().as_str() {
        "OPEN" => BillStatus::Pending,
        "VOID" => BillStatus::Cancelled,
        _ => BillStatus::Paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_csv_status("open"), BillStatus::Pending);
        assert_eq!(map_csv_status("VOID"), BillStatus::Cancelled);
        assert_eq!(map_csv_status("PAID"), BillStatus::Paid);
        assert_eq!(map_csv_status("settled"), BillStatus::Paid);
    }

    #[test]
    fn test_parse_rows() {
        let csv = "bill_id,patient_id,appointment_id,amount,status,created_at\n\
                   7,3,APT-7,52.5,OPEN,2023-12-02 11:30:00\n";
        let bills = parse_bills_csv(csv.as_bytes()).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].bill_id, Some(BillId::new(7)));
        assert_eq!(bills[0].amount, dec!(52.50));
        assert_eq!(bills[0].status, BillStatus::Pending);
        assert_eq!(
            bills[0].created_at.unwrap().to_rfc3339(),
            "2023-12-02T11:30:00+00:00"
        );
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let csv = "bill_id,patient_id,appointment_id,amount,status,created_at\n\
                   1,1,APT-1,10.00,PAID,2023-12-01 10:00:00\n\
                   2,1,APT-2,10.00,PAID,yesterday\n";
        match parse_bills_csv(csv.as_bytes()) {
            Err(SeedError::InvalidRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_amount_beyond_column_limit_is_rejected() {
        let csv = "bill_id,patient_id,appointment_id,amount,status,created_at\n\
                   1,1,APT-1,10000000000.00,PAID,2023-12-01 10:00:00\n";
        match parse_bills_csv(csv.as_bytes()) {
            Err(SeedError::InvalidRow { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("exceeds"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
