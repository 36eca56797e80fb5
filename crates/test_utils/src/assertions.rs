//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for bills that give more
//! meaningful error messages than standard assertions.

use domain_billing::{Bill, BillPage};
use rust_decimal::Decimal;

/// Asserts that a bill amount equals the expected value at two decimal places
pub fn assert_amount_eq(actual: Decimal, expected: Decimal) {
    assert_eq!(
        actual, expected,
        "Amount mismatch: actual={}, expected={}",
        actual, expected
    );
    assert!(
        actual.scale() <= 2,
        "Amount {} carries more than two decimal places",
        actual
    );
}

/// Asserts that bills are ordered newest first, ties broken by id descending
pub fn assert_newest_first(bills: &[Bill]) {
    for pair in bills.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let ordered = a.created_at > b.created_at
            || (a.created_at == b.created_at && a.bill_id > b.bill_id);
        assert!(
            ordered,
            "Bills out of order: {} ({}) before {} ({})",
            a.bill_id, a.created_at, b.bill_id, b.created_at
        );
    }
}

/// Asserts the paging metadata of a page
pub fn assert_page_meta(page: &BillPage, total: u64, page_number: i64, total_pages: u64) {
    assert_eq!(page.total, total, "total mismatch");
    assert_eq!(page.page, page_number, "page mismatch");
    assert_eq!(page.total_pages, total_pages, "total_pages mismatch");
    assert!(
        page.bills.len() as i64 <= page.page_size,
        "Page holds {} bills but page_size is {}",
        page.bills.len(),
        page.page_size
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_eq_accepts_equal_values() {
        assert_amount_eq(dec!(1575.00), dec!(1575.00));
    }

    #[test]
    #[should_panic(expected = "more than two decimal places")]
    fn test_amount_eq_rejects_unrounded() {
        assert_amount_eq(dec!(10.605), dec!(10.605));
    }

    #[test]
    fn test_newest_first_accepts_empty() {
        assert_newest_first(&[]);
    }
}
