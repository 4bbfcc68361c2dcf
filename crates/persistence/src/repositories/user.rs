//! User repository for database operations.

use domain::models::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::user::{UserCredentialsEntity, UserEntity};

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        nickname: &str,
    ) -> Result<User, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password_hash, nickname)
            VALUES ($1, $2, $3)
            RETURNING id, email, nickname, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(nickname)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, nickname, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Fetch login credentials by email (case-insensitive).
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentialsEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentialsEntity>(
            r#"
            SELECT id, email, password_hash, nickname
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
