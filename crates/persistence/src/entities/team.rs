//! Team entity (database row mapping).

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub name: String,
    pub team_code: String,
    pub invite_token: Option<String>,
    pub invite_token_expires_at: Option<DateTime<Utc>>,
    pub founder_id: Uuid,
    pub settings: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl From<TeamEntity> for domain::models::Team {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            team_code: entity.team_code,
            invite_token: entity.invite_token,
            invite_token_expires_at: entity.invite_token_expires_at,
            founder_id: entity.founder_id,
            settings: entity.settings,
            created_at: entity.created_at,
        }
    }
}
