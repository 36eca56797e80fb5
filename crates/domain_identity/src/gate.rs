//! Authentication gate

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::IdentityError;
use crate::password::CredentialHasher;
use crate::ports::PrincipalStore;
use crate::principal::{Credentials, Principal};

/// Verifies caller credentials against stored accounts
#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn PrincipalStore>,
    hasher: CredentialHasher,
}

impl AuthGate {
    /// Creates a gate over the given account store
    pub fn new(store: Arc<dyn PrincipalStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Returns the account store
    pub fn store(&self) -> &Arc<dyn PrincipalStore> {
        &self.store
    }

    /// Returns the password hasher
    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    /// Authenticates a caller
    ///
    /// Hash verification runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// * `IdentityError::InvalidCredentials` - unknown user or wrong password
    /// * `IdentityError::Store` / `IdentityError::Hashing` - unexpected failure
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Principal, IdentityError> {
        let account = match self.store.find_by_username(&credentials.username).await? {
            Some(account) => account,
            None => {
                warn!(username = %credentials.username, "Failed authentication attempt");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        let hasher = self.hasher.clone();
        let password = credentials.password.clone();
        let hash = account.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| IdentityError::Hashing(e.to_string()))??;

        if !verified {
            warn!(username = %credentials.username, "Failed authentication attempt");
            return Err(IdentityError::InvalidCredentials);
        }

        info!(username = %account.username, "User authenticated");
        Ok(account.principal())
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}
