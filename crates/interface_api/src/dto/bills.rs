//! Bill DTOs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use core_kernel::{AppointmentId, PatientId, APPOINTMENT_ID_MAX_LEN};
use domain_billing::{
    Bill, BillFilter, BillPage, BillStatus, BillingError, CreateBillRequest, DEFAULT_PAGE_SIZE,
};

/// Body of `POST /v1/bills`
///
/// `appointment_id` must be a JSON string and the fees JSON numbers; the
/// other JSON type is rejected in each case.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBillBody {
    pub patient_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub appointment_id: String,
    #[serde(deserialize_with = "fee_from_number")]
    pub consultation_fee: Decimal,
    #[serde(default, deserialize_with = "fee_from_number")]
    pub medication_fee: Decimal,
}

/// Reads a fee from a JSON number, keeping its shortest decimal form
///
/// `10.1` becomes `10.1`, not the binary expansion of the float.
fn fee_from_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| D::Error::custom(format!("fee {} is out of range", text)))
}

impl From<CreateBillBody> for CreateBillRequest {
    fn from(body: CreateBillBody) -> Self {
        CreateBillRequest {
            patient_id: PatientId::new(body.patient_id),
            appointment_id: AppointmentId::new(body.appointment_id),
            consultation_fee: body.consultation_fee,
            medication_fee: body.medication_fee,
        }
    }
}

/// Query string of `GET /v1/bills`
#[derive(Debug, Default, Deserialize)]
pub struct ListBillsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub patient_id: Option<i64>,
    pub appointment_id: Option<String>,
    pub status: Option<String>,
}

impl ListBillsQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Builds the store filter; an unknown status is a validation error
    pub fn filter(&self) -> Result<BillFilter, BillingError> {
        let mut filter = BillFilter::all();
        if let Some(patient_id) = self.patient_id {
            filter = filter.patient(PatientId::new(patient_id));
        }
        if let Some(ref appointment_id) = self.appointment_id {
            filter = filter.appointment(AppointmentId::new(appointment_id.as_str()));
        }
        if let Some(ref status) = self.status {
            filter = filter.status(status.parse::<BillStatus>()?);
        }
        Ok(filter)
    }
}

/// A bill as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct BillResponse {
    pub bill_id: i64,
    pub patient_id: i64,
    pub appointment_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            bill_id: bill.bill_id.value(),
            patient_id: bill.patient_id.value(),
            appointment_id: bill.appointment_id.into_inner(),
            amount: bill.amount,
            status: bill.status,
            created_at: bill.created_at,
        }
    }
}

/// One page of bills
#[derive(Debug, Serialize, Deserialize)]
pub struct BillListResponse {
    pub bills: Vec<BillResponse>,
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: u64,
}

impl From<BillPage> for BillListResponse {
    fn from(page: BillPage) -> Self {
        Self {
            bills: page.bills.into_iter().map(BillResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_appointment_id_rejected() {
        let body = r#"{"patient_id": 1, "appointment_id": 101, "consultation_fee": 10.0}"#;
        assert!(serde_json::from_str::<CreateBillBody>(body).is_err());
    }

    #[test]
    fn test_string_fees_rejected() {
        let body = r#"{"patient_id": 1, "appointment_id": "APT-1", "consultation_fee": "1000"}"#;
        assert!(serde_json::from_str::<CreateBillBody>(body).is_err());

        let body = r#"{"patient_id": 1, "appointment_id": "APT-1", "consultation_fee": 10, "medication_fee": "5.00"}"#;
        assert!(serde_json::from_str::<CreateBillBody>(body).is_err());
    }

    #[test]
    fn test_fee_numbers_keep_their_decimal_form() {
        let body = r#"{"patient_id": 1, "appointment_id": "APT-1", "consultation_fee": 10.10, "medication_fee": 500}"#;
        let parsed: CreateBillBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.consultation_fee, Decimal::from_str("10.1").unwrap());
        assert_eq!(parsed.medication_fee, Decimal::from(500));
    }

    #[test]
    fn test_fee_beyond_decimal_range_rejected() {
        let body = r#"{"patient_id": 1, "appointment_id": "APT-1", "consultation_fee": 1e40}"#;
        assert!(serde_json::from_str::<CreateBillBody>(body).is_err());
    }

    #[test]
    fn test_medication_fee_defaults_to_zero() {
        let body = r#"{"patient_id": 1, "appointment_id": "APT-1", "consultation_fee": 10.0}"#;
        let parsed: CreateBillBody = serde_json::from_str(body).unwrap();
        assert!(parsed.medication_fee.is_zero());
    }

    #[test]
    fn test_overlong_appointment_id_fails_validation() {
        let body = CreateBillBody {
            patient_id: 1,
            appointment_id: "A".repeat(APPOINTMENT_ID_MAX_LEN + 1),
            consultation_fee: Decimal::ONE,
            medication_fee: Decimal::ZERO,
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = ListBillsQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.filter().unwrap(), BillFilter::all());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let query = ListBillsQuery {
            status: Some("REFUNDED".to_string()),
            ..Default::default()
        };
        assert!(query.filter().is_err());
    }
}
