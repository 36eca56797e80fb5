//! Billing Domain Ports
//!
//! `BillStore` is everything the billing domain needs from persistence.
//!
//! - **Postgres adapter** (`infra_db::adapters::PostgresBillStore`): the
//!   `UNIQUE` constraint on `appointment_id` is the authoritative guard
//! - **In-memory store** (`mock` feature, tests): uniqueness is checked
//!   under the write lock
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::{BillService, BillStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BillStore> = Arc::new(PostgresBillStore::new(pool));
//! let service = BillService::new(store);
//! ```

use async_trait::async_trait;

use core_kernel::{AppointmentId, BillId, DomainPort, HealthCheckable, PortError};

use crate::bill::{Bill, NewBill};
use crate::query::BillFilter;

/// The persistence port for bills
///
/// Implementations must return `PortError::Conflict` from `insert` and
/// `import` when an appointment already has a bill, even under concurrent
/// inserts.
#[async_trait]
pub trait BillStore: DomainPort + HealthCheckable {
    /// Persists a new bill, assigning `bill_id` and `created_at` when unset
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the appointment already has a bill.
    async fn insert(&self, bill: NewBill) -> Result<Bill, PortError>;

    /// Finds the bill for an appointment
    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Bill>, PortError>;

    /// Finds a bill by id
    async fn find_by_id(&self, bill_id: BillId) -> Result<Option<Bill>, PortError>;

    /// Returns one window of matching bills and the total match count
    ///
    /// Results are ordered by `created_at` descending, then `bill_id`
    /// descending. The count ignores `offset` and `limit`.
    async fn query(
        &self,
        filter: &BillFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Bill>, u64), PortError>;

    /// Returns the number of stored bills
    async fn count(&self) -> Result<u64, PortError>;

    /// Inserts historical bills in one unit; either all are stored or none
    ///
    /// Subsequent `insert` calls must be assigned ids above every imported id.
    async fn import(&self, bills: Vec<NewBill>) -> Result<u64, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default)]
    struct State {
        bills: BTreeMap<BillId, Bill>,
        next_id: i64,
    }

    impl State {
        fn allocate_id(&mut self) -> BillId {
            self.next_id += 1;
            BillId::new(self.next_id)
        }

        fn has_appointment(&self, appointment_id: &AppointmentId) -> bool {
            self.bills.values().any(|b| &b.appointment_id == appointment_id)
        }
    }

    /// In-memory implementation of BillStore
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryBillStore {
        state: Arc<RwLock<State>>,
        unavailable: Arc<AtomicBool>,
    }

    impl InMemoryBillStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every call fail with a connection error until re-enabled
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Returns a snapshot of every stored bill, ordered by id
        pub async fn snapshot(&self) -> Vec<Bill> {
            self.state.read().await.bills.values().cloned().collect()
        }

        fn ensure_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("in-memory bill store is unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryBillStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryBillStore {
        async fn health_check(&self) -> HealthCheckResult {
            match self.ensure_available() {
                Ok(()) => HealthCheckResult::healthy("in-memory-bill-store", 0),
                Err(e) => HealthCheckResult::unhealthy("in-memory-bill-store", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl BillStore for InMemoryBillStore {
        async fn insert(&self, bill: NewBill) -> Result<Bill, PortError> {
            self.ensure_available()?;
            let mut state = self.state.write().await;

            if state.has_appointment(&bill.appointment_id) {
                return Err(PortError::conflict(format!(
                    "bill for appointment '{}' already exists",
                    bill.appointment_id
                )));
            }
            if let Some(id) = bill.bill_id {
                if state.bills.contains_key(&id) {
                    return Err(PortError::conflict(format!(
                        "{} with id {} already exists",
                        BillId::label(),
                        id
                    )));
                }
            }

            let assigned = match bill.bill_id {
                Some(id) => {
                    state.next_id = state.next_id.max(id.value());
                    id
                }
                None => state.allocate_id(),
            };
            let stored = bill.into_bill(assigned, Utc::now());
            state.bills.insert(stored.bill_id, stored.clone());
            Ok(stored)
        }

        async fn find_by_appointment(
            &self,
            appointment_id: &AppointmentId,
        ) -> Result<Option<Bill>, PortError> {
            self.ensure_available()?;
            let state = self.state.read().await;
            Ok(state
                .bills
                .values()
                .find(|b| &b.appointment_id == appointment_id)
                .cloned())
        }

        async fn find_by_id(&self, bill_id: BillId) -> Result<Option<Bill>, PortError> {
            self.ensure_available()?;
            Ok(self.state.read().await.bills.get(&bill_id).cloned())
        }

        async fn query(
            &self,
            filter: &BillFilter,
            offset: i64,
            limit: i64,
        ) -> Result<(Vec<Bill>, u64), PortError> {
            self.ensure_available()?;
            let state = self.state.read().await;

            let mut matching: Vec<Bill> = state
                .bills
                .values()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect();
            matching.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.bill_id.cmp(&a.bill_id))
            });

            let total = matching.len() as u64;
            let page = matching
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect();
            Ok((page, total))
        }

        async fn count(&self) -> Result<u64, PortError> {
            self.ensure_available()?;
            Ok(self.state.read().await.bills.len() as u64)
        }

        async fn import(&self, bills: Vec<NewBill>) -> Result<u64, PortError> {
            self.ensure_available()?;
            let mut state = self.state.write().await;

            let mut appointments = HashSet::new();
            for bill in &bills {
                if state.has_appointment(&bill.appointment_id)
                    || !appointments.insert(bill.appointment_id.clone())
                {
                    return Err(PortError::conflict(format!(
                        "bill for appointment '{}' already exists",
                        bill.appointment_id
                    )));
                }
                if let Some(id) = bill.bill_id {
                    if state.bills.contains_key(&id) {
                        return Err(PortError::conflict(format!(
                        "{} with id {} already exists",
                        BillId::label(),
                        id
                    )));
                    }
                }
            }

            let now = Utc::now();
            let mut imported = 0;
            for bill in bills {
                let id = match bill.bill_id {
                    Some(id) => id,
                    None => state.allocate_id(),
                };
                state.next_id = state.next_id.max(id.value());
                state.bills.insert(id, bill.into_bill(id, now));
                imported += 1;
            }
            Ok(imported)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core_kernel::PatientId;
        use rust_decimal_macros::dec;

        fn new_bill(appointment: &str) -> NewBill {
            NewBill::pending(PatientId::new(1), AppointmentId::new(appointment), dec!(105.00))
        }

        #[tokio::test]
        async fn test_insert_assigns_increasing_ids() {
            let store = InMemoryBillStore::new();
            let first = store.insert(new_bill("APT-1")).await.unwrap();
            let second = store.insert(new_bill("APT-2")).await.unwrap();
            assert!(second.bill_id > first.bill_id);
        }

        #[tokio::test]
        async fn test_insert_rejects_duplicate_appointment() {
            let store = InMemoryBillStore::new();
            store.insert(new_bill("APT-1")).await.unwrap();
            let err = store.insert(new_bill("APT-1")).await.unwrap_err();
            assert!(err.is_conflict());
            assert_eq!(store.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_import_advances_id_sequence() {
            let store = InMemoryBillStore::new();
            store
                .import(vec![new_bill("APT-OLD").with_id(BillId::new(500))])
                .await
                .unwrap();
            let created = store.insert(new_bill("APT-NEW")).await.unwrap();
            assert_eq!(created.bill_id, BillId::new(501));
        }

        #[tokio::test]
        async fn test_import_is_all_or_nothing() {
            let store = InMemoryBillStore::new();
            store.insert(new_bill("APT-1")).await.unwrap();
            let result = store.import(vec![new_bill("APT-2"), new_bill("APT-1")]).await;
            assert!(result.is_err());
            assert_eq!(store.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_unavailable_store_fails_health_check() {
            let store = InMemoryBillStore::new();
            store.set_unavailable(true);
            let health = store.health_check().await;
            assert!(!health.status.is_operational());
            assert!(store.count().await.unwrap_err().is_transient());
        }
    }
}
