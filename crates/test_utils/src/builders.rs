//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, Utc};
use core_kernel::{AppointmentId, BillId, PatientId};
use domain_billing::{BillStatus, CreateBillRequest, NewBill};
use fake::Fake;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::fixtures::{FeeFixtures, IdFixtures, TemporalFixtures};

/// Returns an appointment id that is unique across test runs
pub fn unique_appointment_id() -> AppointmentId {
    AppointmentId::new(format!("APT-{}", Uuid::new_v4().simple()))
}

/// Returns a random patient id in a realistic range
pub fn random_patient_id() -> PatientId {
    PatientId::new((1i64..100_000).fake::<i64>())
}

/// Builder for [`CreateBillRequest`]
pub struct CreateBillRequestBuilder {
    patient_id: PatientId,
    appointment_id: AppointmentId,
    consultation_fee: Decimal,
    medication_fee: Decimal,
}

impl Default for CreateBillRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateBillRequestBuilder {
    /// Creates a new builder with the standard fees and a unique appointment
    pub fn new() -> Self {
        Self {
            patient_id: IdFixtures::patient_id(),
            appointment_id: unique_appointment_id(),
            consultation_fee: FeeFixtures::consultation(),
            medication_fee: FeeFixtures::medication(),
        }
    }

    pub fn with_patient_id(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn with_appointment_id(mut self, appointment_id: impl Into<AppointmentId>) -> Self {
        self.appointment_id = appointment_id.into();
        self
    }

    pub fn with_fees(mut self, consultation_fee: Decimal, medication_fee: Decimal) -> Self {
        self.consultation_fee = consultation_fee;
        self.medication_fee = medication_fee;
        self
    }

    pub fn build(self) -> CreateBillRequest {
        CreateBillRequest {
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            consultation_fee: self.consultation_fee,
            medication_fee: self.medication_fee,
        }
    }
}

/// Builder for historical [`NewBill`] records, as produced by an import
pub struct TestBillBuilder {
    bill_id: Option<BillId>,
    patient_id: PatientId,
    appointment_id: AppointmentId,
    amount: Decimal,
    status: BillStatus,
    created_at: Option<DateTime<Utc>>,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a PENDING bill with the standard total and a fixed timestamp
    pub fn new() -> Self {
        Self {
            bill_id: None,
            patient_id: IdFixtures::patient_id(),
            appointment_id: unique_appointment_id(),
            amount: FeeFixtures::standard_total(),
            status: BillStatus::Pending,
            created_at: Some(TemporalFixtures::created_at()),
        }
    }

    pub fn with_bill_id(mut self, id: i64) -> Self {
        self.bill_id = Some(BillId::new(id));
        self
    }

    pub fn with_patient_id(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn with_appointment_id(mut self, appointment_id: impl Into<AppointmentId>) -> Self {
        self.appointment_id = appointment_id.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_status(mut self, status: BillStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Leaves `created_at` for the store to assign
    pub fn created_now(mut self) -> Self {
        self.created_at = None;
        self
    }

    pub fn build(self) -> NewBill {
        NewBill {
            bill_id: self.bill_id,
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            amount: self.amount,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Builds `count` bills for one patient, one minute apart, oldest first
pub fn bill_series(patient_id: PatientId, count: usize) -> Vec<NewBill> {
    (0..count)
        .map(|i| {
            TestBillBuilder::new()
                .with_patient_id(patient_id)
                .with_appointment_id(format!("APT-SERIES-{:03}", i))
                .with_created_at(TemporalFixtures::minutes_after(i as i64))
                .build()
        })
        .collect()
}
