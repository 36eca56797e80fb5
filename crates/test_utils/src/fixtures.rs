//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for bills and credentials. These
//! fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{AppointmentId, BillId, PatientId};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for fee and amount test data
pub struct FeeFixtures;

impl FeeFixtures {
    /// Standard consultation fee
    pub fn consultation() -> Decimal {
        dec!(1000.0)
    }

    /// Standard medication fee
    pub fn medication() -> Decimal {
        dec!(500.0)
    }

    /// Taxed total of the standard fees
    pub fn standard_total() -> Decimal {
        dec!(1575.00)
    }

    /// Fees whose taxed total lands exactly on a half cent (10.605)
    pub fn half_cent_fees() -> (Decimal, Decimal) {
        (dec!(10.10), dec!(0))
    }

    /// Half-up rounded total of [`FeeFixtures::half_cent_fees`]
    pub fn half_cent_total() -> Decimal {
        dec!(10.61)
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn patient_id() -> PatientId {
        PatientId::new(1)
    }

    pub fn other_patient_id() -> PatientId {
        PatientId::new(2)
    }

    pub fn bill_id() -> BillId {
        BillId::new(1)
    }

    pub fn appointment_id() -> AppointmentId {
        AppointmentId::new("APT-101")
    }

    /// Appointment id of exactly the maximum accepted length
    pub fn longest_appointment_id() -> AppointmentId {
        AppointmentId::new("A".repeat(core_kernel::APPOINTMENT_ID_MAX_LEN))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed creation time (Jan 15, 2024 09:30 UTC)
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    /// The creation time shifted by whole minutes
    pub fn minutes_after(minutes: i64) -> DateTime<Utc> {
        Self::created_at() + chrono::Duration::minutes(minutes)
    }
}

/// Default credentials seeded on first start
pub struct CredentialFixtures;

impl CredentialFixtures {
    pub const ADMIN_USERNAME: &'static str = "admin";
    pub const ADMIN_PASSWORD: &'static str = "admin123";
    pub const BILLING_USERNAME: &'static str = "billing_user";
    pub const BILLING_PASSWORD: &'static str = "billing123";

    /// `Authorization` header value for the admin account
    pub const ADMIN_BASIC_HEADER: &'static str = "Basic YWRtaW46YWRtaW4xMjM=";
}

/// Historical bills in the import file format
pub struct CsvFixtures;

impl CsvFixtures {
    pub fn sample_bills_csv() -> &'static str {
        &SAMPLE_BILLS_CSV
    }
}

static SAMPLE_BILLS_CSV: Lazy<String> = Lazy::new(|| {
    [
        "bill_id,patient_id,appointment_id,amount,status,created_at",
        "1,10,APT-OLD-1,105.00,PAID,2023-12-01 10:00:00",
        "2,11,APT-OLD-2,52.50,OPEN,2023-12-02 11:30:00",
        "5,10,APT-OLD-3,210.00,VOID,2023-12-03 08:15:00",
    ]
    .join("\n")
});
