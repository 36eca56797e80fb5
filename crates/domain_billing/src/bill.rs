//! Bill records
//!
//! A bill is created once per appointment and never deleted. Everything but
//! the status is fixed at creation; no status transitions are modelled here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AppointmentId, BillId, PatientId};

use crate::error::BillingError;

/// Bill status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillStatus {
    /// Awaiting payment (initial state)
    #[default]
    Pending,
    /// Settled
    Paid,
    /// Voided
    Cancelled,
}

impl BillStatus {
    /// Returns the wire/storage name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "PENDING",
            BillStatus::Paid => "PAID",
            BillStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BillStatus::Pending),
            "PAID" => Ok(BillStatus::Paid),
            "CANCELLED" => Ok(BillStatus::Cancelled),
            other => Err(BillingError::validation(format!("unknown bill status '{}'", other))),
        }
    }
}

/// A persisted bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// System-assigned identifier, increasing with creation order
    pub bill_id: BillId,
    /// Patient being billed (opaque reference)
    pub patient_id: PatientId,
    /// Appointment the bill belongs to, unique across bills
    pub appointment_id: AppointmentId,
    /// Taxed total, two decimal places
    pub amount: Decimal,
    /// Current status
    pub status: BillStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A bill about to be inserted
///
/// `bill_id` and `created_at` are normally left unset and assigned by the
/// store. Historical imports carry both.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub bill_id: Option<BillId>,
    pub patient_id: PatientId,
    pub appointment_id: AppointmentId,
    pub amount: Decimal,
    pub status: BillStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewBill {
    /// Creates a pending bill with store-assigned id and timestamp
    pub fn pending(patient_id: PatientId, appointment_id: AppointmentId, amount: Decimal) -> Self {
        Self {
            bill_id: None,
            patient_id,
            appointment_id,
            amount,
            status: BillStatus::Pending,
            created_at: None,
        }
    }

    /// Sets an explicit identifier
    pub fn with_id(mut self, bill_id: BillId) -> Self {
        self.bill_id = Some(bill_id);
        self
    }

    /// Sets an explicit status
    pub fn with_status(mut self, status: BillStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets an explicit creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Materializes the bill with the given id and timestamp, keeping any
    /// values already set
    pub fn into_bill(self, assigned_id: BillId, now: DateTime<Utc>) -> Bill {
        Bill {
            bill_id: self.bill_id.unwrap_or(assigned_id),
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            amount: self.amount,
            status: self.status,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&BillStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("paid".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert!("OPEN".parse::<BillStatus>().is_err());
    }

    #[test]
    fn test_into_bill_keeps_explicit_values() {
        let created = Utc::now() - chrono::Duration::days(3);
        let bill = NewBill::pending(PatientId::new(1), AppointmentId::new("APT-1"), dec!(10.50))
            .with_id(BillId::new(77))
            .with_created_at(created)
            .into_bill(BillId::new(1), Utc::now());

        assert_eq!(bill.bill_id, BillId::new(77));
        assert_eq!(bill.created_at, created);
        assert_eq!(bill.status, BillStatus::Pending);
    }
}
