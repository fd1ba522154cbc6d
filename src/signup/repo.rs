use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

/// A user row ready to be inserted. The store assigns `id` and `is_verified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user conflicts with an existing row: {0}")]
    Conflict(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(e),
            _ => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError>;
}

/// `UserStore` backed by the `users` table in Postgres.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, email, password, verification_code)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.verification_code)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
