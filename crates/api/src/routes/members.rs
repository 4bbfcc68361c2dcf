//! Member routes: listing and role management.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use domain::models::{MemberWithDetails, Membership, UpdateMemberRoleRequest};
use domain::services::access;
use persistence::repositories::MembershipRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::routes::teams::member_snapshot;

/// List a team's members. Any member may look.
///
/// GET /api/v1/teams/:team_id/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<MemberWithDetails>>, ApiError> {
    member_snapshot(&state, team_id, user.user_id).await?;

    let members = MembershipRepository::new(state.pool.clone())
        .list_with_details(team_id)
        .await?;

    Ok(Json(members))
}

/// Promote or demote a member. Admin only; the founder is untouchable.
///
/// PUT /api/v1/teams/:team_id/members/:user_id/role
pub async fn update_member_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, target_user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<Json<Membership>, ApiError> {
    let actor = member_snapshot(&state, team_id, user.user_id).await?;

    let memberships = MembershipRepository::new(state.pool.clone());
    let target = memberships.snapshot(team_id, target_user_id).await?;

    let allowed = if request.is_admin {
        access::can_promote_member(Some(&actor), target.as_ref(), team_id)
    } else {
        access::can_demote_admin(Some(&actor), target.as_ref(), team_id)
    };

    if !allowed {
        // Distinguish a missing target from a forbidden change
        if target.is_none() {
            return Err(ApiError::NotFound("Member not found".to_string()));
        }
        return Err(ApiError::Forbidden(
            "Role change not permitted".to_string(),
        ));
    }

    let membership = memberships
        .set_admin(team_id, target_user_id, request.is_admin)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    tracing::info!(
        team_id = %team_id,
        target_user_id = %target_user_id,
        is_admin = request.is_admin,
        actor_id = %user.user_id,
        "Member role changed"
    );

    Ok(Json(membership))
}
