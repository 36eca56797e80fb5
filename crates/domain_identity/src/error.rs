//! Identity domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors raised while authenticating or managing accounts
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Invalid authentication credentials")]
    InvalidCredentials,

    /// Hashing failed or a stored hash is malformed
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Account store failure
    #[error("Principal store error: {0}")]
    Store(#[from] PortError),
}

impl IdentityError {
    /// Returns true when the caller presented bad credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, IdentityError::InvalidCredentials)
    }
}
