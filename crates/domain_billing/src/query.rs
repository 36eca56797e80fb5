//! Bill queries and pagination

use serde::Serialize;

use core_kernel::{AppointmentId, PatientId};

use crate::bill::{Bill, BillStatus};
use crate::error::BillingError;

/// Page size used when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Filters for listing bills
///
/// Every supplied filter must match (logical AND). An empty filter matches
/// every bill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub patient_id: Option<PatientId>,
    pub appointment_id: Option<AppointmentId>,
    pub status: Option<BillStatus>,
}

impl BillFilter {
    /// Creates a filter that matches every bill
    pub fn all() -> Self {
        Self::default()
    }

    pub fn patient(mut self, patient_id: PatientId) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn status(mut self, status: BillStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true when the bill satisfies every supplied filter
    pub fn matches(&self, bill: &Bill) -> bool {
        if let Some(patient_id) = self.patient_id {
            if bill.patient_id != patient_id {
                return false;
            }
        }
        if let Some(ref appointment_id) = self.appointment_id {
            if &bill.appointment_id != appointment_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if bill.status != status {
                return false;
            }
        }
        true
    }
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
    offset: i64,
}

impl PageRequest {
    /// Validates page and page size
    ///
    /// Out-of-range values are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// `BillingError::Validation` if `page < 1`, `page_size` is outside
    /// `1..=100`, or the resulting offset does not fit in an `i64`.
    pub fn new(page: i64, page_size: i64) -> Result<Self, BillingError> {
        if page < 1 {
            return Err(BillingError::validation("page must be greater than or equal to 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(BillingError::validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| BillingError::validation("page is out of range"))?;

        Ok(Self { page, page_size, offset })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of matching records skipped before this page
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of records on this page
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// One page of bills plus totals
#[derive(Debug, Clone, Serialize)]
pub struct BillPage {
    pub bills: Vec<Bill>,
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: u64,
}

impl BillPage {
    pub fn new(bills: Vec<Bill>, total: u64, request: PageRequest) -> Self {
        Self {
            bills,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total_pages(total, request.page_size()),
        }
    }
}

/// `ceil(total / page_size)`, zero when there are no records
fn total_pages(total: u64, page_size: i64) -> u64 {
    let page_size = page_size.max(1) as u64;
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn test_page_must_be_positive() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(-3, 10).is_err());
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 10).unwrap();
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_huge_page_is_rejected() {
        assert!(PageRequest::new(i64::MAX, 100).is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 100), 1);
    }
}
