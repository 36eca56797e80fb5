//! Bill repository implementation
//!
//! This module provides database access for the `bills` table. The
//! `UNIQUE (appointment_id)` constraint is what keeps concurrent creates
//! for one appointment down to a single row; a losing insert surfaces as
//! `DatabaseError::DuplicateEntry`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DatabaseError;

const BILL_COLUMNS: &str = "bill_id, patient_id, appointment_id, amount, status, created_at";

/// Repository for the `bills` table
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    /// Creates a new BillRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a bill and returns the stored row
    ///
    /// `bill_id` falls back to the serial sequence and `created_at` to the
    /// database clock when not supplied.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if the appointment already
    /// has a bill.
    pub async fn insert(&self, bill: &NewBillRow) -> Result<BillRow, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(
            r#"
            INSERT INTO bills (bill_id, patient_id, appointment_id, amount, status, created_at)
            VALUES (
                COALESCE($1, nextval(pg_get_serial_sequence('bills', 'bill_id'))),
                $2, $3, $4, $5,
                COALESCE($6, now())
            )
            RETURNING bill_id, patient_id, appointment_id, amount, status, created_at
            "#,
        )
        .bind(bill.bill_id)
        .bind(bill.patient_id)
        .bind(&bill.appointment_id)
        .bind(bill.amount)
        .bind(bill.status)
        .bind(bill.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts historical bills in a single transaction
    ///
    /// Afterwards the id sequence is moved past the highest stored id so
    /// new bills never collide with imported ones.
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    pub async fn insert_batch(&self, bills: &[NewBillRow]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for bill in bills {
            let result = sqlx::query(
                r#"
                INSERT INTO bills (bill_id, patient_id, appointment_id, amount, status, created_at)
                VALUES (
                    COALESCE($1, nextval(pg_get_serial_sequence('bills', 'bill_id'))),
                    $2, $3, $4, $5,
                    COALESCE($6, now())
                )
                "#,
            )
            .bind(bill.bill_id)
            .bind(bill.patient_id)
            .bind(&bill.appointment_id)
            .bind(bill.amount)
            .bind(bill.status)
            .bind(bill.created_at)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('bills', 'bill_id'),
                COALESCE(MAX(bill_id), 1),
                MAX(bill_id) IS NOT NULL
            )
            FROM bills
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    /// Retrieves a bill by id
    pub async fn find_by_id(&self, bill_id: i64) -> Result<Option<BillRow>, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {} FROM bills WHERE bill_id = $1",
            BILL_COLUMNS
        ))
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Retrieves the bill for an appointment
    pub async fn find_by_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<BillRow>, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {} FROM bills WHERE appointment_id = $1",
            BILL_COLUMNS
        ))
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Returns one window of matching bills and the total match count
    ///
    /// Ordered newest first with `bill_id` as the tie breaker.
    pub async fn search(
        &self,
        query: &BillSearch,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<BillRow>, i64), DatabaseError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM bills WHERE TRUE");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM bills WHERE TRUE",
            BILL_COLUMNS
        ));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY created_at DESC, bill_id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = select
            .build_query_as::<BillRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Returns the number of bills
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BillSearch) {
    if let Some(patient_id) = query.patient_id {
        builder.push(" AND patient_id = ").push_bind(patient_id);
    }
    if let Some(ref appointment_id) = query.appointment_id {
        builder.push(" AND appointment_id = ").push_bind(appointment_id.clone());
    }
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

/// Bill status as stored in the `bill_status` enum type
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "bill_status", rename_all = "UPPERCASE")]
pub enum BillStatus {
    Pending,
    Paid,
    Cancelled,
}

/// Database row for a bill
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub bill_id: i64,
    pub patient_id: i64,
    pub appointment_id: String,
    pub amount: Decimal,
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a bill
#[derive(Debug, Clone)]
pub struct NewBillRow {
    pub bill_id: Option<i64>,
    pub patient_id: i64,
    pub appointment_id: String,
    pub amount: Decimal,
    pub status: BillStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for [`BillRepository::search`]; all supplied filters must match
#[derive(Debug, Clone, Default)]
pub struct BillSearch {
    pub patient_id: Option<i64>,
    pub appointment_id: Option<String>,
    pub status: Option<BillStatus>,
}
