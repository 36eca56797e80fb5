//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{AppointmentId, PatientId, APPOINTMENT_ID_MAX_LEN};
use domain_billing::BillStatus;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for valid consultation fees (strictly positive, two decimals)
pub fn consultation_fee_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for valid medication fees (zero or positive, two decimals)
pub fn medication_fee_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for negative fees
pub fn negative_fee_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..0i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for patient ids
pub fn patient_id_strategy() -> impl Strategy<Value = PatientId> {
    (1i64..1_000_000i64).prop_map(PatientId::new)
}

/// Strategy for valid appointment ids
pub fn appointment_id_strategy() -> impl Strategy<Value = AppointmentId> {
    let pattern = format!("[A-Z0-9-]{{1,{}}}", APPOINTMENT_ID_MAX_LEN);
    proptest::string::string_regex(&pattern)
        .expect("valid appointment id regex")
        .prop_map(AppointmentId::new)
}

/// Strategy for bill statuses
pub fn bill_status_strategy() -> impl Strategy<Value = BillStatus> {
    prop_oneof![
        Just(BillStatus::Pending),
        Just(BillStatus::Paid),
        Just(BillStatus::Cancelled),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_appointment_ids_are_valid(id in appointment_id_strategy()) {
            prop_assert!(id.validate().is_ok());
        }

        #[test]
        fn test_generated_fees_are_in_range(
            c in consultation_fee_strategy(),
            m in medication_fee_strategy(),
        ) {
            prop_assert!(c > Decimal::ZERO);
            prop_assert!(m >= Decimal::ZERO);
        }
    }
}
