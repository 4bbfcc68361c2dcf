//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account.
///
/// Credentials live in the persistence layer; this model never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

/// Minimal user info embedded in member and entry responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserInfo {
    pub id: Uuid,
    pub nickname: String,
}
