//! PostgreSQL Bill Adapter
//!
//! Implements the billing domain's `BillStore` port on top of
//! [`BillRepository`]. Domain values are converted to row structs on the
//! way in and back on the way out; database errors become `PortError`s.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AppointmentId, BillId, DomainPort, HealthCheckResult, HealthCheckable, PatientId, PortError,
};
use domain_billing::{Bill, BillFilter, BillStatus, BillStore, NewBill};

use crate::adapters::db_to_port_error;
use crate::repositories::bills::{
    BillRepository, BillRow, BillSearch, BillStatus as DbBillStatus, NewBillRow,
};

const ADAPTER_ID: &str = "postgres-bill-store";

/// PostgreSQL-backed implementation of the BillStore trait
///
/// # Health Checking
///
/// The health check runs `SELECT 1` against the pool.
///
/// # Error Handling
///
/// - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
/// - connection failures -> `PortError::Connection`
/// - everything else -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresBillStore {
    repository: BillRepository,
    pool: PgPool,
}

impl PostgresBillStore {
    /// Creates a new PostgreSQL bill store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &BillRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillStore {}

#[async_trait]
impl HealthCheckable for PostgresBillStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl BillStore for PostgresBillStore {
    #[instrument(skip(self, bill), fields(appointment_id = %bill.appointment_id))]
    async fn insert(&self, bill: NewBill) -> Result<Bill, PortError> {
        debug!("Inserting bill");

        let row = self
            .repository
            .insert(&new_bill_to_row(bill))
            .await
            .map_err(db_to_port_error)?;

        Ok(row_to_bill(row))
    }

    #[instrument(skip(self), fields(appointment_id = %appointment_id))]
    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Bill>, PortError> {
        let row = self
            .repository
            .find_by_appointment(appointment_id.as_str())
            .await
            .map_err(db_to_port_error)?;

        Ok(row.map(row_to_bill))
    }

    #[instrument(skip(self), fields(bill_id = %bill_id))]
    async fn find_by_id(&self, bill_id: BillId) -> Result<Option<Bill>, PortError> {
        let row = self
            .repository
            .find_by_id(bill_id.value())
            .await
            .map_err(db_to_port_error)?;

        Ok(row.map(row_to_bill))
    }

    #[instrument(skip(self, filter))]
    async fn query(
        &self,
        filter: &BillFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Bill>, u64), PortError> {
        debug!("Querying bills with filter: {:?}", filter);

        let search = BillSearch {
            patient_id: filter.patient_id.map(|p| p.value()),
            appointment_id: filter.appointment_id.as_ref().map(|a| a.as_str().to_string()),
            status: filter.status.map(domain_to_db_status),
        };

        let (rows, total) = self
            .repository
            .search(&search, offset, limit)
            .await
            .map_err(db_to_port_error)?;

        let total = u64::try_from(total)
            .map_err(|_| PortError::internal(format!("negative bill count {}", total)))?;

        Ok((rows.into_iter().map(row_to_bill).collect(), total))
    }

    async fn count(&self) -> Result<u64, PortError> {
        let total = self.repository.count().await.map_err(db_to_port_error)?;
        u64::try_from(total).map_err(|_| PortError::internal(format!("negative bill count {}", total)))
    }

    #[instrument(skip(self, bills), fields(count = bills.len()))]
    async fn import(&self, bills: Vec<NewBill>) -> Result<u64, PortError> {
        let rows: Vec<NewBillRow> = bills.into_iter().map(new_bill_to_row).collect();
        self.repository
            .insert_batch(&rows)
            .await
            .map_err(db_to_port_error)
    }
}

/// Runs a trivial query against the pool and reports the round trip
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn row_to_bill(row: BillRow) -> Bill {
    Bill {
        bill_id: BillId::new(row.bill_id),
        patient_id: PatientId::new(row.patient_id),
        appointment_id: AppointmentId::new(row.appointment_id),
        amount: row.amount,
        status: db_to_domain_status(row.status),
        created_at: row.created_at,
    }
}

fn new_bill_to_row(bill: NewBill) -> NewBillRow {
    NewBillRow {
        bill_id: bill.bill_id.map(|id| id.value()),
        patient_id: bill.patient_id.value(),
        appointment_id: bill.appointment_id.into_inner(),
        amount: bill.amount,
        status: domain_to_db_status(bill.status),
        created_at: bill.created_at,
    }
}

fn db_to_domain_status(s: DbBillStatus) -> BillStatus {
    match s {
        DbBillStatus::Pending => BillStatus::Pending,
        DbBillStatus::Paid => BillStatus::Paid,
        DbBillStatus::Cancelled => BillStatus::Cancelled,
    }
}

fn domain_to_db_status(s: BillStatus) -> DbBillStatus {
    match s {
        BillStatus::Pending => DbBillStatus::Pending,
        BillStatus::Paid => DbBillStatus::Paid,
        BillStatus::Cancelled => DbBillStatus::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [BillStatus::Pending, BillStatus::Paid, BillStatus::Cancelled] {
            assert_eq!(db_to_domain_status(domain_to_db_status(status)), status);
        }
    }

    #[test]
    fn test_row_to_bill_keeps_fields() {
        let now = Utc::now();
        let bill = row_to_bill(BillRow {
            bill_id: 7,
            patient_id: 3,
            appointment_id: "APT-7".to_string(),
            amount: dec!(1575.00),
            status: DbBillStatus::Paid,
            created_at: now,
        });

        assert_eq!(bill.bill_id, BillId::new(7));
        assert_eq!(bill.patient_id, PatientId::new(3));
        assert_eq!(bill.appointment_id.as_str(), "APT-7");
        assert_eq!(bill.amount, dec!(1575.00));
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.created_at, now);
    }

    #[test]
    fn test_new_bill_leaves_defaults_to_database() {
        let row = new_bill_to_row(NewBill::pending(
            PatientId::new(1),
            AppointmentId::new("APT-1"),
            dec!(105.00),
        ));

        assert!(row.bill_id.is_none());
        assert!(row.created_at.is_none());
        assert_eq!(row.status, DbBillStatus::Pending);
    }
}
