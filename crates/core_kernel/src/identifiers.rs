//! Strongly-typed identifiers for domain entities
//!
//! Bills and patients are keyed by integers and appointments by opaque
//! strings. Wrapping them in newtypes prevents a patient id from being passed
//! where a bill id is expected, and keeps the appointment id a string all the
//! way through (no implicit conversion from integers).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Maximum length of an appointment identifier (matches the column width)
pub const APPOINTMENT_ID_MAX_LEN: usize = 100;

macro_rules! define_int_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from its raw value
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw value
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Returns the label used in log and error messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_int_id!(BillId, "bill");
define_int_id!(PatientId, "patient");

/// Identifier of the appointment a bill belongs to
///
/// Always a string. Deserializing from a JSON number fails rather than
/// coercing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    /// Wraps a raw value without checking it
    ///
    /// Use [`AppointmentId::parse`] for values coming from callers.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses and validates an appointment identifier
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the value is blank or longer than
    /// [`APPOINTMENT_ID_MAX_LEN`] characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let id = Self(value.into());
        id.validate()?;
        Ok(id)
    }

    /// Checks the identifier is non-blank and fits the column
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.0.trim().is_empty() {
            return Err(CoreError::validation("appointment_id must not be empty"));
        }
        if self.0.chars().count() > APPOINTMENT_ID_MAX_LEN {
            return Err(CoreError::validation(format!(
                "appointment_id must be at most {} characters",
                APPOINTMENT_ID_MAX_LEN
            )));
        }
        Ok(())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AppointmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_id_display() {
        assert_eq!(BillId::new(42).to_string(), "42");
    }

    #[test]
    fn test_id_parsing() {
        let parsed: PatientId = " 17 ".parse().unwrap();
        assert_eq!(parsed, PatientId::new(17));
        assert!("abc".parse::<BillId>().is_err());
    }

    #[test]
    fn test_appointment_id_rejects_blank() {
        assert!(AppointmentId::parse("   ").is_err());
        assert!(AppointmentId::parse("APT-101").is_ok());
    }
}
