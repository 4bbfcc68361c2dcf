//! Membership entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{MemberWithDetails, Membership, MembershipSnapshot, UserInfo};

/// Row mapping for the memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<MembershipEntity> for Membership {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            user_id: entity.user_id,
            is_admin: entity.is_admin,
            joined_at: entity.joined_at,
        }
    }
}

/// Role snapshot row: membership joined against the team's founder column.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipSnapshotEntity {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub is_admin: bool,
    pub is_founder: bool,
}

impl From<MembershipSnapshotEntity> for MembershipSnapshot {
    fn from(entity: MembershipSnapshotEntity) -> Self {
        Self {
            user_id: entity.user_id,
            team_id: entity.team_id,
            is_admin: entity.is_admin,
            is_founder: entity.is_founder,
        }
    }
}

/// Membership with user details for member-list responses.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithDetailsEntity {
    pub user_id: Uuid,
    pub user_nickname: String,
    pub is_admin: bool,
    pub is_founder: bool,
    pub joined_at: DateTime<Utc>,
}

impl From<MemberWithDetailsEntity> for MemberWithDetails {
    fn from(entity: MemberWithDetailsEntity) -> Self {
        Self {
            user: UserInfo {
                id: entity.user_id,
                nickname: entity.user_nickname,
            },
            is_admin: entity.is_admin,
            is_founder: entity.is_founder,
            joined_at: entity.joined_at,
        }
    }
}
