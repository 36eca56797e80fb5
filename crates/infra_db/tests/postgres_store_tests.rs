//! PostgreSQL store tests
//!
//! These start a disposable PostgreSQL container and are ignored by
//! default. Run with `cargo test -p infra_db -- --ignored` on a machine
//! with Docker.

use std::sync::Arc;

use core_kernel::{AppointmentId, BillId, HealthCheckable, PatientId};
use domain_billing::{BillFilter, BillService, BillStatus, BillStore, BillingError};
use domain_identity::{NewUserAccount, PrincipalStore};
use infra_db::{ensure_schema, PostgresBillStore, PostgresPrincipalStore};
use rust_decimal_macros::dec;
use test_utils::{
    assert_newest_first, bill_series, create_isolated_test_database, BillingTable,
    CreateBillRequestBuilder, TemporalFixtures, TestBillBuilder,
};

#[tokio::test]
#[ignore = "requires docker"]
async fn test_insert_assigns_id_and_timestamp() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresBillStore::new(db.pool().clone());

    let bill = store
        .insert(TestBillBuilder::new().created_now().build())
        .await
        .unwrap();

    assert!(bill.bill_id.value() > 0);
    assert_eq!(bill.status, BillStatus::Pending);
    assert_eq!(bill.amount, dec!(1575.00));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_unique_constraint_maps_to_conflict() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresBillStore::new(db.pool().clone());

    store
        .insert(TestBillBuilder::new().with_appointment_id("APT-1").build())
        .await
        .unwrap();
    let err = store
        .insert(TestBillBuilder::new().with_appointment_id("APT-1").build())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_concurrent_creates_store_one_bill() {
    let db = create_isolated_test_database().await.unwrap();
    let service = BillService::new(Arc::new(PostgresBillStore::new(db.pool().clone())));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_bill(
                    CreateBillRequestBuilder::new()
                        .with_appointment_id("APT-RACE")
                        .build(),
                    None,
                )
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(BillingError::DuplicateBill(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(db.row_count(BillingTable::Bills).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_query_filters_orders_and_counts() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresBillStore::new(db.pool().clone());

    store.import(bill_series(PatientId::new(1), 12)).await.unwrap();
    store
        .insert(
            TestBillBuilder::new()
                .with_patient_id(PatientId::new(2))
                .with_status(BillStatus::Paid)
                .build(),
        )
        .await
        .unwrap();

    let filter = BillFilter::all().patient(PatientId::new(1));
    let (first, total) = store.query(&filter, 0, 5).await.unwrap();
    let (last, _) = store.query(&filter, 10, 5).await.unwrap();

    assert_eq!(total, 12);
    assert_eq!(first.len(), 5);
    assert_eq!(last.len(), 2);
    assert_newest_first(&first);
    assert_eq!(first[0].appointment_id, AppointmentId::new("APT-SERIES-011"));

    let paid = BillFilter::all().status(BillStatus::Paid);
    let (_, paid_total) = store.query(&paid, 0, 10).await.unwrap();
    assert_eq!(paid_total, 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_equal_timestamps_break_ties_by_id() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresBillStore::new(db.pool().clone());

    for id in [3, 1, 2] {
        store
            .import(vec![TestBillBuilder::new()
                .with_bill_id(id)
                .with_created_at(TemporalFixtures::created_at())
                .build()])
            .await
            .unwrap();
    }

    let (bills, _) = store.query(&BillFilter::all(), 0, 10).await.unwrap();
    let ids: Vec<i64> = bills.iter().map(|b| b.bill_id.value()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_import_moves_sequence_past_imported_ids() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresBillStore::new(db.pool().clone());

    let imported = store
        .import(vec![
            TestBillBuilder::new().with_bill_id(40).build(),
            TestBillBuilder::new().with_bill_id(41).build(),
        ])
        .await
        .unwrap();
    let created = store.insert(TestBillBuilder::new().build()).await.unwrap();

    assert_eq!(imported, 2);
    assert_eq!(created.bill_id, BillId::new(42));
    assert!(store.find_by_id(BillId::new(40)).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_schema_bootstrap_is_rerunnable() {
    let db = create_isolated_test_database().await.unwrap();

    let store = PostgresBillStore::new(db.pool().clone());
    store.insert(TestBillBuilder::new().build()).await.unwrap();

    ensure_schema(db.pool()).await.unwrap();
    ensure_schema(db.pool()).await.unwrap();

    assert!(store.health_check().await.status.is_operational());
    assert_eq!(db.row_count(BillingTable::Bills).await.unwrap(), 1);

    db.clear_data().await.unwrap();
    assert_eq!(db.row_count(BillingTable::Bills).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_principal_store_roundtrip() {
    let db = create_isolated_test_database().await.unwrap();
    let store = PostgresPrincipalStore::new(db.pool().clone());

    store
        .insert_all(vec![NewUserAccount {
            username: "admin".to_string(),
            password_hash: "$argon2id$hash".to_string(),
        }])
        .await
        .unwrap();

    let account = store.find_by_username("admin").await.unwrap().unwrap();
    assert_eq!(account.password_hash, "$argon2id$hash");
    assert!(store.find_by_username("nobody").await.unwrap().is_none());
    assert_eq!(store.count().await.unwrap(), 1);
}
