//! Team routes: create, read, update, dissolve, join, leave, invites.
//!
//! Membership is resolved to a `MembershipSnapshot` up front and every
//! decision goes through the predicates in `domain::services::access`.
//! Non-members get 404, not 403: a denied caller cannot probe whether a
//! team exists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateTeamRequest, InviteLinkResponse, JoinTeamRequest, Membership, MembershipSnapshot, Team,
    TeamResponse, UpdateTeamRequest,
};
use domain::services::access;
use persistence::repositories::{MembershipRepository, TeamRepository};
use shared::crypto::{generate_invite_token, generate_team_code};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::middleware::metrics;

/// Attempts before giving up on finding an unused team code.
const TEAM_CODE_ATTEMPTS: usize = 5;

/// Resolves the caller's membership snapshot, or masks the team as missing.
pub(crate) async fn member_snapshot(
    state: &AppState,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<MembershipSnapshot, ApiError> {
    MembershipRepository::new(state.pool.clone())
        .snapshot(team_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))
}

/// Response for a successful join.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinTeamResponse {
    pub team: TeamResponse,
    pub membership: Membership,
}

/// Create a team. The caller becomes founder and admin.
///
/// POST /api/v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    request.validate()?;

    let teams = TeamRepository::new(state.pool.clone());

    let mut team_code = generate_team_code();
    for attempt in 0.. {
        if !teams.code_exists(&team_code).await? {
            break;
        }
        if attempt + 1 >= TEAM_CODE_ATTEMPTS {
            return Err(ApiError::Internal(
                "Could not allocate a unique team code".to_string(),
            ));
        }
        team_code = generate_team_code();
    }

    let settings = request.settings.unwrap_or_else(|| serde_json::json!({}));
    let team = teams
        .create(&request.name, &team_code, user.user_id, settings)
        .await?;

    tracing::info!(team_id = %team.id, founder_id = %user.user_id, "Team created");
    metrics::record_team_created();

    Ok((StatusCode::CREATED, Json(team.into())))
}

/// Fetch a team. Members only; everyone else sees 404.
///
/// GET /api/v1/teams/:team_id
pub async fn get_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    member_snapshot(&state, team_id, user.user_id).await?;

    let team = TeamRepository::new(state.pool.clone())
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(team.into()))
}

/// Update team name and/or settings. Admin only.
///
/// PUT /api/v1/teams/:team_id
pub async fn update_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
    Json(request): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    request.validate()?;

    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_update_team(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team admins can update the team".to_string(),
        ));
    }

    let team = TeamRepository::new(state.pool.clone())
        .update(team_id, request.name.as_deref(), request.settings)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(team.into()))
}

/// Dissolve a team. Admin only; entries and memberships cascade.
///
/// DELETE /api/v1/teams/:team_id
pub async fn delete_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_delete_team(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team admins can dissolve the team".to_string(),
        ));
    }

    let deleted = TeamRepository::new(state.pool.clone()).delete(team_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    tracing::info!(team_id = %team_id, actor_id = %user.user_id, "Team dissolved");

    Ok(StatusCode::NO_CONTENT)
}

/// Join a team by permanent code or by invite token. Exactly one credential.
///
/// POST /api/v1/teams/join
pub async fn join_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<JoinTeamRequest>,
) -> Result<(StatusCode, Json<JoinTeamResponse>), ApiError> {
    if !request.is_well_formed() {
        return Err(ApiError::Validation(
            "Provide exactly one of team_code or invite_token".to_string(),
        ));
    }

    let teams = TeamRepository::new(state.pool.clone());
    let team: Team = if let Some(ref code) = request.team_code {
        teams.find_by_code(code).await?
    } else if let Some(ref token) = request.invite_token {
        // Expired tokens are filtered in the query itself
        teams.find_by_invite_token(token).await?
    } else {
        None
    }
    .ok_or_else(|| ApiError::NotFound("No team matches that code or invite".to_string()))?;

    let memberships = MembershipRepository::new(state.pool.clone());
    if memberships.exists(team.id, user.user_id).await? {
        return Err(ApiError::Conflict(
            "You are already a member of this team".to_string(),
        ));
    }

    let membership = memberships.create(team.id, user.user_id, false).await?;

    tracing::info!(team_id = %team.id, user_id = %user.user_id, "Member joined team");
    metrics::record_member_joined();

    Ok((
        StatusCode::CREATED,
        Json(JoinTeamResponse {
            team: team.into(),
            membership,
        }),
    ))
}

/// Leave a team. Any member except the founder.
///
/// POST /api/v1/teams/:team_id/leave
pub async fn leave_team(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_leave_team(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "The founder cannot leave the team; dissolve it instead".to_string(),
        ));
    }

    MembershipRepository::new(state.pool.clone())
        .delete(team_id, user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn invite_url(base_url: &str, token: &str) -> String {
    format!("{}/join?invite_token={}", base_url.trim_end_matches('/'), token)
}

/// Generate (rotate) the team's invite link. Admin only.
///
/// POST /api/v1/teams/:team_id/invite
pub async fn generate_invite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<(StatusCode, Json<InviteLinkResponse>), ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_manage_invites(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team admins can manage invites".to_string(),
        ));
    }

    let token = generate_invite_token();
    let expires_at = Utc::now() + Duration::hours(state.config.invites.token_ttl_hours);

    TeamRepository::new(state.pool.clone())
        .set_invite_token(team_id, &token, expires_at)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    tracing::info!(team_id = %team_id, actor_id = %user.user_id, "Invite token rotated");

    Ok((
        StatusCode::CREATED,
        Json(InviteLinkResponse {
            invite_url: invite_url(&state.config.invites.base_url, &token),
            invite_token: token,
            expires_at,
        }),
    ))
}

/// Fetch the current invite link. Admin only; 404 when none is active.
///
/// GET /api/v1/teams/:team_id/invite
pub async fn get_invite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<InviteLinkResponse>, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_manage_invites(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team admins can manage invites".to_string(),
        ));
    }

    let team = TeamRepository::new(state.pool.clone())
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    if !team.has_active_invite(Utc::now()) {
        return Err(ApiError::NotFound("No active invite link".to_string()));
    }

    let token = team.invite_token.unwrap_or_default();
    let expires_at = team.invite_token_expires_at.unwrap_or_else(Utc::now);

    Ok(Json(InviteLinkResponse {
        invite_url: invite_url(&state.config.invites.base_url, &token),
        invite_token: token,
        expires_at,
    }))
}

/// Revoke the current invite link. Admin only.
///
/// DELETE /api/v1/teams/:team_id/invite
pub async fn revoke_invite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_manage_invites(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team admins can manage invites".to_string(),
        ));
    }

    TeamRepository::new(state.pool.clone())
        .clear_invite_token(team_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_url_format() {
        assert_eq!(
            invite_url("https://app.example.com", "tok123"),
            "https://app.example.com/join?invite_token=tok123"
        );
    }

    #[test]
    fn test_invite_url_strips_trailing_slash() {
        assert_eq!(
            invite_url("https://app.example.com/", "tok123"),
            "https://app.example.com/join?invite_token=tok123"
        );
    }

    #[test]
    fn test_join_team_response_serialization() {
        let team = Team {
            id: Uuid::new_v4(),
            name: "Kaizen".to_string(),
            team_code: "AB23CD45".to_string(),
            invite_token: Some("secret".to_string()),
            invite_token_expires_at: Some(Utc::now()),
            founder_id: Uuid::new_v4(),
            settings: serde_json::json!({}),
            created_at: Utc::now(),
        };
        let response = JoinTeamResponse {
            team: team.into(),
            membership: Membership {
                id: Uuid::new_v4(),
                team_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                is_admin: false,
                joined_at: Utc::now(),
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        // The invite token never leaks through the join response
        assert!(!json.contains("secret"));
        assert!(json.contains("AB23CD45"));
    }
}
