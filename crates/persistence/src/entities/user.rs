//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row mapping for the users table, without credentials.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            nickname: entity.nickname,
            created_at: entity.created_at,
        }
    }
}

/// Row mapping including the password hash, used only by the auth service.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentialsEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
}
