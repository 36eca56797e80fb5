//! PostgreSQL Principal Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_identity::{NewUserAccount, PrincipalStore, UserAccount};

use crate::adapters::bills::ping;
use crate::adapters::db_to_port_error;
use crate::repositories::users::{NewUserRow, UserRepository, UserRow};

/// PostgreSQL-backed implementation of the PrincipalStore trait
#[derive(Debug, Clone)]
pub struct PostgresPrincipalStore {
    repository: UserRepository,
    pool: PgPool,
}

impl PostgresPrincipalStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPrincipalStore {}

#[async_trait]
impl HealthCheckable for PostgresPrincipalStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-principal-store").await
    }
}

#[async_trait]
impl PrincipalStore for PostgresPrincipalStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, PortError> {
        let row = self
            .repository
            .find_by_username(username)
            .await
            .map_err(db_to_port_error)?;

        Ok(row.map(row_to_account))
    }

    #[instrument(skip(self, accounts), fields(count = accounts.len()))]
    async fn insert_all(&self, accounts: Vec<NewUserAccount>) -> Result<u64, PortError> {
        let rows: Vec<NewUserRow> = accounts
            .into_iter()
            .map(|a| NewUserRow {
                username: a.username,
                hashed_password: a.password_hash,
            })
            .collect();

        self.repository
            .insert_batch(&rows)
            .await
            .map_err(db_to_port_error)
    }

    async fn count(&self) -> Result<u64, PortError> {
        let total = self.repository.count().await.map_err(db_to_port_error)?;
        u64::try_from(total).map_err(|_| PortError::internal(format!("negative user count {}", total)))
    }
}

fn row_to_account(row: UserRow) -> UserAccount {
    UserAccount {
        id: row.id,
        username: row.username,
        password_hash: row.hashed_password,
    }
}
