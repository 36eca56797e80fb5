//! Tests for the typed identifiers
//!
//! Covers construction, parsing, display and the serde shape the HTTP layer
//! relies on.

use core_kernel::{AppointmentId, BillId, PatientId, APPOINTMENT_ID_MAX_LEN};

mod int_id_tests {
    use super::*;

    #[test]
    fn test_round_trip_through_i64() {
        let id = BillId::from(9_000_000_001);
        let raw: i64 = id.into();
        assert_eq!(raw, 9_000_000_001);
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(BillId::new(1) < BillId::new(2));
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&PatientId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_labels() {
        assert_eq!(BillId::label(), "bill");
        assert_eq!(PatientId::label(), "patient");
    }
}

mod appointment_id_tests {
    use super::*;

    #[test]
    fn test_parse_accepts_max_length() {
        let value = "A".repeat(APPOINTMENT_ID_MAX_LEN);
        assert!(AppointmentId::parse(value).is_ok());
    }

    #[test]
    fn test_parse_rejects_overlong() {
        let value = "A".repeat(APPOINTMENT_ID_MAX_LEN + 1);
        assert!(AppointmentId::parse(value).is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(AppointmentId::parse("").is_err());
    }

    #[test]
    fn test_deserializes_from_string() {
        let id: AppointmentId = serde_json::from_str("\"APT-101\"").unwrap();
        assert_eq!(id.as_str(), "APT-101");
    }

    #[test]
    fn test_does_not_coerce_integers() {
        let result = serde_json::from_str::<AppointmentId>("101");
        assert!(result.is_err());
    }
}
