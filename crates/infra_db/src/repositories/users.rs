//! User repository implementation

use sqlx::PgPool;

use crate::error::DatabaseError;

/// Repository for the `users` table
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, hashed_password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts users in a single transaction
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateEntry` if a username is taken; no
    /// rows are kept in that case.
    pub async fn insert_batch(&self, users: &[NewUserRow]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for user in users {
            let result = sqlx::query("INSERT INTO users (username, hashed_password) VALUES ($1, $2)")
                .bind(&user.username)
                .bind(&user.hashed_password)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Returns the number of users
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

/// Database row for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
}

/// Data for inserting a user
#[derive(Debug, Clone)]
pub struct NewUserRow {
    pub username: String,
    pub hashed_password: String,
}
