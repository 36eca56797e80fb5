//! Fee computation
//!
//! `total = round((consultation_fee + medication_fee) * 1.05, 2)`
//!
//! Arithmetic is exact decimal and rounding is half-up (midpoint away from
//! zero; all inputs are non-negative). A subtotal of `0.10` therefore bills
//! `0.11`, not the banker's `0.10`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BillingError;

/// Flat tax applied to the fee subtotal (5%)
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Decimal places stored for bill amounts
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Largest amount a bill can hold, `9999999999.99` (the `NUMERIC(12, 2)` column limit)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rounds an amount to two decimal places, half-up
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validated fee inputs for a new bill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillFees {
    consultation_fee: Decimal,
    medication_fee: Decimal,
}

impl BillFees {
    /// Validates the fee inputs
    ///
    /// # Errors
    ///
    /// `BillingError::Validation` if the consultation fee is not strictly
    /// positive or the medication fee is negative.
    pub fn new(consultation_fee: Decimal, medication_fee: Decimal) -> Result<Self, BillingError> {
        if consultation_fee <= Decimal::ZERO {
            return Err(BillingError::validation("consultation_fee must be greater than 0"));
        }
        if medication_fee < Decimal::ZERO {
            return Err(BillingError::validation("medication_fee must be greater than or equal to 0"));
        }
        Ok(Self {
            consultation_fee,
            medication_fee,
        })
    }

    pub fn consultation_fee(&self) -> Decimal {
        self.consultation_fee
    }

    pub fn medication_fee(&self) -> Decimal {
        self.medication_fee
    }

    /// Sum of both fees, before tax
    pub fn subtotal(&self) -> Decimal {
        self.consultation_fee + self.medication_fee
    }

    /// Taxed total, rounded to two decimal places
    ///
    /// # Errors
    ///
    /// `BillingError::Validation` if the total exceeds [`MAX_AMOUNT`].
    pub fn total(&self) -> Result<Decimal, BillingError> {
        self.consultation_fee
            .checked_add(self.medication_fee)
            .and_then(|subtotal| subtotal.checked_mul(Decimal::ONE + TAX_RATE))
            .map(round_amount)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| {
                BillingError::validation(format!("bill amount must not exceed {}", MAX_AMOUNT))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_amount() {
        let fees = BillFees::new(dec!(1000.0), dec!(500.0)).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(1575.00));
    }

    #[test]
    fn test_medication_fee_may_be_zero() {
        let fees = BillFees::new(dec!(200), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(210.00));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 0.10 * 1.05 = 0.105
        let fees = BillFees::new(dec!(0.10), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(0.11));

        // 10.10 * 1.05 = 10.605
        let fees = BillFees::new(dec!(10.10), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(10.61));
    }

    #[test]
    fn test_below_midpoint_rounds_down() {
        // 33.33 * 1.05 = 34.9965
        let fees = BillFees::new(dec!(33.33), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(35.00));

        // 1.01 * 1.05 = 1.0605
        let fees = BillFees::new(dec!(1.01), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), dec!(1.06));
    }

    #[test]
    fn test_rejects_non_positive_consultation_fee() {
        assert!(BillFees::new(Decimal::ZERO, dec!(10)).is_err());
        assert!(BillFees::new(dec!(-1), dec!(10)).is_err());
    }

    #[test]
    fn test_rejects_negative_medication_fee() {
        assert!(BillFees::new(dec!(10), dec!(-0.01)).is_err());
    }

    #[test]
    fn test_overflow_is_a_validation_error() {
        let fees = BillFees::new(Decimal::MAX, Decimal::MAX).unwrap();
        assert!(matches!(fees.total(), Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_max_amount_matches_column_limit() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
    }

    #[test]
    fn test_total_at_max_amount_is_accepted() {
        // 9523809523.80 * 1.05 = 9999999999.990
        let fees = BillFees::new(dec!(9523809523.80), Decimal::ZERO).unwrap();
        assert_eq!(fees.total().unwrap(), MAX_AMOUNT);
    }

    #[test]
    fn test_total_above_max_amount_is_rejected() {
        // 9523809523.81 * 1.05 = 10000000000.0005
        let fees = BillFees::new(dec!(9523809523.81), Decimal::ZERO).unwrap();
        let error = fees.total().unwrap_err();
        assert!(matches!(error, BillingError::Validation(_)));
        assert!(error.to_string().contains("9999999999.99"));
    }

    proptest! {
        #[test]
        fn prop_total_matches_formula(
            consultation_cents in 1i64..100_000_000,
            medication_cents in 0i64..100_000_000,
        ) {
            let consultation = Decimal::new(consultation_cents, 2);
            let medication = Decimal::new(medication_cents, 2);
            let fees = BillFees::new(consultation, medication).unwrap();

            let expected = ((consultation + medication) * dec!(1.05))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let total = fees.total().unwrap();

            prop_assert_eq!(total, expected);
            prop_assert!(total >= fees.subtotal());
            prop_assert!(total.scale() <= 2);
        }
    }
}
