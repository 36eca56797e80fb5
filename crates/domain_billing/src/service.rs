//! Bill service
//!
//! Business rules on top of a [`BillStore`]: validation, the one-bill-per-
//! appointment rule, fee computation, and paginated listing.

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{info, warn};

use core_kernel::{AppointmentId, BillId, OperationMetadata, PatientId, PortError};

use crate::bill::{Bill, NewBill};
use crate::error::BillingError;
use crate::fees::BillFees;
use crate::ports::BillStore;
use crate::query::{BillFilter, BillPage, PageRequest};

/// Input for [`BillService::create_bill`]
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBillRequest {
    pub patient_id: PatientId,
    pub appointment_id: AppointmentId,
    pub consultation_fee: Decimal,
    pub medication_fee: Decimal,
}

/// Service for creating and querying bills
#[derive(Clone)]
pub struct BillService {
    store: Arc<dyn BillStore>,
}

impl BillService {
    /// Creates a new service over the given store
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &Arc<dyn BillStore> {
        &self.store
    }

    /// Creates the bill for an appointment
    ///
    /// 1. Validates the fees and appointment id (no store access on failure)
    /// 2. Rejects the request if the appointment already has a bill
    /// 3. Computes `round((consultation + medication) * 1.05, 2)`
    /// 4. Inserts a PENDING bill and returns the stored record
    ///
    /// The lookup in step 2 only short-circuits the common case. A concurrent
    /// create that slips past it is stopped by the store's conflict error,
    /// which maps to the same `DuplicateBill`.
    ///
    /// # Errors
    ///
    /// * `BillingError::Validation` - bad fees or appointment id
    /// * `BillingError::DuplicateBill` - the appointment is already billed
    /// * `BillingError::Storage` - unexpected store failure
    pub async fn create_bill(
        &self,
        request: CreateBillRequest,
        metadata: Option<&OperationMetadata>,
    ) -> Result<Bill, BillingError> {
        let start = Instant::now();
        let (principal, correlation_id) = log_context(metadata);
        info!(
            patient_id = %request.patient_id,
            appointment_id = %request.appointment_id,
            principal,
            correlation_id,
            "Creating bill"
        );

        let fees = BillFees::new(request.consultation_fee, request.medication_fee)?;
        request.appointment_id.validate()?;
        let amount = fees.total()?;

        if self
            .store
            .find_by_appointment(&request.appointment_id)
            .await?
            .is_some()
        {
            warn!(
                appointment_id = %request.appointment_id,
                correlation_id,
                "Bill already exists for appointment"
            );
            return Err(BillingError::DuplicateBill(request.appointment_id));
        }

        let new_bill = NewBill::pending(request.patient_id, request.appointment_id.clone(), amount);
        let bill = match self.store.insert(new_bill).await {
            Ok(bill) => bill,
            Err(PortError::Conflict { .. }) => {
                warn!(
                    appointment_id = %request.appointment_id,
                    correlation_id,
                    "Concurrent bill creation lost the uniqueness race"
                );
                return Err(BillingError::DuplicateBill(request.appointment_id));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            bill_id = %bill.bill_id,
            amount = %bill.amount,
            correlation_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Bill created successfully"
        );
        Ok(bill)
    }

    /// Lists bills matching `filter`, one page at a time
    ///
    /// Newest first. `page` starts at 1 and `page_size` must be within
    /// `1..=100`; out-of-range values are rejected, not clamped.
    ///
    /// # Errors
    ///
    /// * `BillingError::Validation` - bad paging parameters
    /// * `BillingError::Storage` - unexpected store failure
    pub async fn list_bills(
        &self,
        page: i64,
        page_size: i64,
        filter: BillFilter,
        metadata: Option<&OperationMetadata>,
    ) -> Result<BillPage, BillingError> {
        let start = Instant::now();
        let request = PageRequest::new(page, page_size)?;
        let (principal, correlation_id) = log_context(metadata);
        info!(
            page,
            page_size,
            patient_id = ?filter.patient_id,
            appointment_id = ?filter.appointment_id,
            status = ?filter.status,
            principal,
            correlation_id,
            "Listing bills"
        );

        let (bills, total) = self
            .store
            .query(&filter, request.offset(), request.limit())
            .await?;

        info!(
            count = bills.len(),
            total,
            correlation_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Bills retrieved"
        );
        Ok(BillPage::new(bills, total, request))
    }

    /// Fetches one bill
    ///
    /// # Errors
    ///
    /// * `BillingError::NotFound` - no bill with that id
    /// * `BillingError::Storage` - unexpected store failure
    pub async fn get_bill(
        &self,
        bill_id: BillId,
        metadata: Option<&OperationMetadata>,
    ) -> Result<Bill, BillingError> {
        let start = Instant::now();
        let (principal, correlation_id) = log_context(metadata);
        info!(%bill_id, principal, correlation_id, "Retrieving bill");

        match self.store.find_by_id(bill_id).await? {
            Some(bill) => {
                info!(
                    %bill_id,
                    correlation_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Bill retrieved successfully"
                );
                Ok(bill)
            }
            None => {
                warn!(%bill_id, correlation_id, "Bill not found");
                Err(BillingError::NotFound(bill_id))
            }
        }
    }
}

/// Principal and correlation id attached to every log event of an operation
fn log_context(metadata: Option<&OperationMetadata>) -> (&str, Option<&str>) {
    match metadata {
        Some(metadata) => (metadata.principal(), metadata.correlation_id.as_deref()),
        None => ("anonymous", None),
    }
}

impl std::fmt::Debug for BillService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::InMemoryBillStore;
    use rust_decimal_macros::dec;

    fn service() -> (BillService, InMemoryBillStore) {
        let store = InMemoryBillStore::new();
        (BillService::new(Arc::new(store.clone())), store)
    }

    fn request(appointment: &str) -> CreateBillRequest {
        CreateBillRequest {
            patient_id: PatientId::new(1),
            appointment_id: AppointmentId::new(appointment),
            consultation_fee: dec!(1000.0),
            medication_fee: dec!(500.0),
        }
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let (service, store) = service();
        store.set_unavailable(true);

        let mut bad = request("APT-1");
        bad.consultation_fee = Decimal::ZERO;

        let err = service.create_bill(bad, None).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_appointment_is_rejected() {
        let (service, _) = service();
        let err = service.create_bill(request(" "), None).await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_storage_error() {
        let (service, store) = service();
        store.set_unavailable(true);

        let err = service.create_bill(request("APT-1"), None).await.unwrap_err();
        assert!(matches!(err, BillingError::Storage(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_metadata_is_optional_context() {
        let (service, _) = service();
        let metadata = OperationMetadata::with_correlation_id("req-1").initiated_by("admin");
        let bill = service.create_bill(request("APT-9"), Some(&metadata)).await.unwrap();
        assert_eq!(bill.amount, dec!(1575.00));
    }

    #[test]
    fn test_log_context_carries_correlation_id() {
        let metadata = OperationMetadata::with_correlation_id("req-7").initiated_by("billing_user");
        assert_eq!(log_context(Some(&metadata)), ("billing_user", Some("req-7")));
        assert_eq!(log_context(None), ("anonymous", None));
    }
}
