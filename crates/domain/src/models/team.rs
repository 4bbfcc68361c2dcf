//! Team domain models: the tenant boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

/// A team of users sharing entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// Short human-readable join code, unique across all teams.
    pub team_code: String,
    /// Current shareable invite token, if one has been generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_token_expires_at: Option<DateTime<Utc>>,
    /// The founder is always a member and can never be demoted.
    pub founder_id: Uuid,
    /// Open key-value settings bag.
    pub settings: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Whether the team currently has a non-expired invite token.
    pub fn has_active_invite(&self, now: DateTime<Utc>) -> bool {
        match (&self.invite_token, self.invite_token_expires_at) {
            (Some(_), Some(expires_at)) => expires_at > now,
            _ => false,
        }
    }
}

/// Request to create a team. The caller becomes founder and admin.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 120, message = "Team name must be 1-120 characters"))]
    pub name: String,
    #[serde(default)]
    pub settings: Option<JsonValue>,
}

/// Request to update team name and/or settings. Admin only.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 120, message = "Team name must be 1-120 characters"))]
    pub name: Option<String>,
    pub settings: Option<JsonValue>,
}

/// Request to join a team by code or invite token. Exactly one is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinTeamRequest {
    pub team_code: Option<String>,
    pub invite_token: Option<String>,
}

impl JoinTeamRequest {
    /// A join request must carry exactly one credential.
    pub fn is_well_formed(&self) -> bool {
        self.team_code.is_some() != self.invite_token.is_some()
    }
}

/// Team detail response. The invite token is only exposed to admins via the
/// dedicated invite endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub team_code: String,
    pub founder_id: Uuid,
    pub settings: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            team_code: team.team_code,
            founder_id: team.founder_id,
            settings: team.settings,
            created_at: team.created_at,
        }
    }
}

/// Response for the invite-link endpoints. Admin only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteLinkResponse {
    pub invite_token: String,
    pub invite_url: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(invite: Option<(&str, DateTime<Utc>)>) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Continuous Improvement".to_string(),
            team_code: "AB23CD45".to_string(),
            invite_token: invite.map(|(t, _)| t.to_string()),
            invite_token_expires_at: invite.map(|(_, e)| e),
            founder_id: Uuid::new_v4(),
            settings: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_active_invite() {
        let now = Utc::now();
        let future = now + chrono::Duration::days(7);
        let past = now - chrono::Duration::hours(1);

        assert!(team(Some(("tok", future))).has_active_invite(now));
        assert!(!team(Some(("tok", past))).has_active_invite(now));
        assert!(!team(None).has_active_invite(now));
    }

    #[test]
    fn test_join_request_well_formed() {
        let by_code = JoinTeamRequest {
            team_code: Some("AB23CD45".to_string()),
            invite_token: None,
        };
        let by_token = JoinTeamRequest {
            team_code: None,
            invite_token: Some("token".to_string()),
        };
        let both = JoinTeamRequest {
            team_code: Some("AB23CD45".to_string()),
            invite_token: Some("token".to_string()),
        };
        let neither = JoinTeamRequest {
            team_code: None,
            invite_token: None,
        };

        assert!(by_code.is_well_formed());
        assert!(by_token.is_well_formed());
        assert!(!both.is_well_formed());
        assert!(!neither.is_well_formed());
    }

    #[test]
    fn test_create_team_request_validation() {
        let ok = CreateTeamRequest {
            name: "Kaizen".to_string(),
            settings: None,
        };
        assert!(ok.validate().is_ok());

        let empty = CreateTeamRequest {
            name: String::new(),
            settings: None,
        };
        assert!(empty.validate().is_err());

        let long = CreateTeamRequest {
            name: "x".repeat(121),
            settings: None,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_team_response_hides_invite_token() {
        let now = Utc::now();
        let response: TeamResponse = team(Some(("secret", now))).into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret"));
    }
}
