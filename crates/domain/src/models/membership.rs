//! Team membership models.
//!
//! A membership links one user to one team with a per-team admin flag.
//! Authorization decisions are made over a `MembershipSnapshot`, an explicit
//! value resolved from storage by the caller, so the predicates in
//! `services::access` stay independent of any storage technology.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserInfo;

/// The (user, team, is_admin) relationship. Unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

/// Point-in-time view of an actor's role within a team.
///
/// `is_founder` is derived from the team's founder reference, not stored on
/// the membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipSnapshot {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub is_admin: bool,
    pub is_founder: bool,
}

impl MembershipSnapshot {
    /// Snapshot for a plain member.
    pub fn member(user_id: Uuid, team_id: Uuid) -> Self {
        Self {
            user_id,
            team_id,
            is_admin: false,
            is_founder: false,
        }
    }

    /// Snapshot for a team admin.
    pub fn admin(user_id: Uuid, team_id: Uuid) -> Self {
        Self {
            user_id,
            team_id,
            is_admin: true,
            is_founder: false,
        }
    }

    /// Snapshot for the founder (always an admin).
    pub fn founder(user_id: Uuid, team_id: Uuid) -> Self {
        Self {
            user_id,
            team_id,
            is_admin: true,
            is_founder: true,
        }
    }
}

/// Membership with user details for member-list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberWithDetails {
    pub user: UserInfo,
    pub is_admin: bool,
    pub is_founder: bool,
    pub joined_at: DateTime<Utc>,
}

/// Request to promote or demote a member. Admin only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRoleRequest {
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_constructors() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let member = MembershipSnapshot::member(user_id, team_id);
        assert!(!member.is_admin);
        assert!(!member.is_founder);

        let admin = MembershipSnapshot::admin(user_id, team_id);
        assert!(admin.is_admin);
        assert!(!admin.is_founder);

        let founder = MembershipSnapshot::founder(user_id, team_id);
        assert!(founder.is_admin);
        assert!(founder.is_founder);
    }

    #[test]
    fn test_update_member_role_deserialization() {
        let req: UpdateMemberRoleRequest = serde_json::from_str(r#"{"is_admin": true}"#).unwrap();
        assert!(req.is_admin);
    }
}
