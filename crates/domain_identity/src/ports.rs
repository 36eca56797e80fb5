//! Identity Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::principal::{NewUserAccount, UserAccount};

/// The persistence port for user accounts
#[async_trait]
pub trait PrincipalStore: DomainPort + HealthCheckable {
    /// Finds an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, PortError>;

    /// Inserts accounts in one unit; either all are stored or none
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if a username is already taken.
    async fn insert_all(&self, accounts: Vec<NewUserAccount>) -> Result<u64, PortError>;

    /// Returns the number of stored accounts
    async fn count(&self) -> Result<u64, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory implementation of PrincipalStore
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryPrincipalStore {
        accounts: Arc<RwLock<BTreeMap<String, UserAccount>>>,
    }

    impl InMemoryPrincipalStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryPrincipalStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryPrincipalStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-principal-store", 0)
        }
    }

    #[async_trait]
    impl PrincipalStore for InMemoryPrincipalStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, PortError> {
            Ok(self.accounts.read().await.get(username).cloned())
        }

        async fn insert_all(&self, accounts: Vec<NewUserAccount>) -> Result<u64, PortError> {
            let mut stored = self.accounts.write().await;

            let mut batch = HashSet::new();
            for account in &accounts {
                if stored.contains_key(&account.username) || !batch.insert(account.username.as_str()) {
                    return Err(PortError::conflict(format!(
                        "user '{}' already exists",
                        account.username
                    )));
                }
            }

            let mut next_id = stored.len() as i64;
            let inserted = accounts.len() as u64;
            for account in accounts {
                next_id += 1;
                stored.insert(
                    account.username.clone(),
                    UserAccount {
                        id: next_id,
                        username: account.username,
                        password_hash: account.password_hash,
                    },
                );
            }
            Ok(inserted)
        }

        async fn count(&self) -> Result<u64, PortError> {
            Ok(self.accounts.read().await.len() as u64)
        }
    }
}
