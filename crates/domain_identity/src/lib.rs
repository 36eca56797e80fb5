//! Identity Domain - Principals and the Auth Gate
//!
//! Callers of the billing API are authenticated against stored user
//! accounts before any bill operation runs. This crate owns that check:
//!
//! - **UserAccount**: username plus Argon2 password hash
//! - **PrincipalStore**: the persistence port for accounts
//! - **CredentialHasher**: Argon2id hashing and verification
//! - **AuthGate**: `authenticate(credentials) -> Principal`
//!
//! The resulting [`Principal`] is only used as logging context; it carries
//! no authorization rules.

pub mod principal;
pub mod password;
pub mod ports;
pub mod gate;
pub mod error;

pub use principal::{Credentials, NewUserAccount, Principal, UserAccount};
pub use password::CredentialHasher;
pub use ports::PrincipalStore;
pub use gate::AuthGate;
pub use error::IdentityError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryPrincipalStore;
