//! Billing domain errors

use thiserror::Error;

use core_kernel::{AppointmentId, BillId, CoreError, PortError};

/// Errors that can occur in the billing domain
///
/// Everything except `Storage` is the caller's problem and carries a
/// message safe to return to clients.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Bad input shape or range; nothing was changed
    #[error("Validation error: {0}")]
    Validation(String),

    /// A bill already exists for the appointment; nothing was changed
    #[error("Bill already exists for appointment {0}")]
    DuplicateBill(AppointmentId),

    /// No bill with the given id
    #[error("{label} with id {0} not found", label = BillId::label())]
    NotFound(BillId),

    /// Unexpected persistence failure
    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    /// Returns true for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, BillingError::Storage(_))
    }
}

impl From<CoreError> for BillingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => BillingError::Validation(msg),
        }
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation { message, .. } => BillingError::Validation(message),
            other => BillingError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_bill() {
        let error = BillingError::NotFound(BillId::new(42));
        assert_eq!(error.to_string(), "bill with id 42 not found");
        assert!(error.is_client_error());
    }
}
