//! Entry routes: submission, listing, partial update, and the delete
//! lifecycle (soft delete, restore, permanent removal).
//!
//! `final_prio` is written exclusively as the output of the priority engine.
//! Partial updates merge over the stored row first, and recompute only when
//! the payload touches a priority-relevant field.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateEntryRequest, Entry, EntryResponse, ListEntriesQuery, UpdateEntryRequest, UserInfo,
};
use domain::services::access::{self, EntryRef};
use domain::services::{compute_priority, PriorityInput};
use persistence::repositories::entry::EntryRecord;
use persistence::repositories::EntryRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::middleware::metrics;
use crate::routes::teams::member_snapshot;

fn entry_ref(entry: &Entry) -> EntryRef {
    EntryRef {
        team_id: entry.team_id,
        creator_id: entry.creator_id,
    }
}

/// Fetches an entry with its author, treating a team mismatch as absence.
async fn fetch_entry_in_team(
    state: &AppState,
    team_id: Uuid,
    entry_id: Uuid,
) -> Result<(Entry, UserInfo), ApiError> {
    let found = EntryRepository::new(state.pool.clone())
        .find_with_author(entry_id)
        .await?;

    match found {
        Some((entry, author)) if entry.team_id == team_id => Ok((entry, author)),
        _ => Err(ApiError::NotFound("Entry not found".to_string())),
    }
}

/// Submit an entry. Any team member.
///
/// POST /api/v1/teams/:team_id/entries
pub async fn create_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    request.validate()?;

    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_create_entry(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team members can submit entries".to_string(),
        ));
    }

    let final_prio = compute_priority(PriorityInput {
        manual_override: request.manual_override_prio,
        time_saved_per_year: request.time_saved_per_year,
        gross_profit_per_year: request.gross_profit_per_year,
        effort: request.effort,
    });

    let record = EntryRecord {
        problem: request.problem,
        solution: request.solution,
        area: request.area,
        time_saved_per_year: request.time_saved_per_year,
        gross_profit_per_year: request.gross_profit_per_year,
        effort: request.effort,
        monetary_explanation: request.monetary_explanation,
        link: request.link,
        anonymous: request.anonymous,
        manual_override_prio: request.manual_override_prio,
        final_prio,
    };

    let repo = EntryRepository::new(state.pool.clone());
    let entry = repo.create(team_id, user.user_id, record).await?;
    let (entry, author) = fetch_entry_in_team(&state, team_id, entry.id).await?;

    tracing::info!(
        entry_id = %entry.id,
        team_id = %team_id,
        final_prio = entry.final_prio,
        "Entry created"
    );
    metrics::record_entry_created();

    Ok((StatusCode::CREATED, Json(EntryResponse::new(entry, author))))
}

/// List a team's entries, highest priority first.
///
/// GET /api/v1/teams/:team_id/entries
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_list_entries(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team members can list entries".to_string(),
        ));
    }

    let rows = EntryRepository::new(state.pool.clone())
        .list_with_authors(team_id, &query)
        .await?;

    let responses = rows
        .into_iter()
        .map(|(entry, author)| EntryResponse::new(entry, author))
        .collect();

    Ok(Json(responses))
}

/// Fetch one entry.
///
/// GET /api/v1/teams/:team_id/entries/:entry_id
pub async fn get_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    let (entry, author) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    if !access::can_view_entry(Some(&snapshot), entry_ref(&entry)) {
        return Err(ApiError::NotFound("Entry not found".to_string()));
    }

    Ok(Json(EntryResponse::new(entry, author)))
}

/// Partially update an entry. Creator or admin.
///
/// Absent fields keep their stored values. The priority is recomputed over
/// the merged attribute set only when the payload touches one of the
/// priority-relevant fields.
///
/// PUT /api/v1/teams/:team_id/entries/:entry_id
pub async fn update_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, entry_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    request.validate()?;

    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    let (entry, _) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    if !access::can_update_entry(Some(&snapshot), entry_ref(&entry)) {
        return Err(ApiError::Forbidden(
            "Only the creator or a team admin can update this entry".to_string(),
        ));
    }

    let merged = PriorityInput::merged(&entry, &request);
    let final_prio = if request.touches_priority() {
        compute_priority(merged)
    } else {
        entry.final_prio
    };

    let record = EntryRecord {
        problem: request.problem.unwrap_or(entry.problem),
        solution: request.solution.unwrap_or(entry.solution),
        area: request.area.unwrap_or(entry.area),
        time_saved_per_year: merged.time_saved_per_year,
        gross_profit_per_year: merged.gross_profit_per_year,
        effort: merged.effort,
        monetary_explanation: request.monetary_explanation.or(entry.monetary_explanation),
        link: request.link.or(entry.link),
        anonymous: request.anonymous.unwrap_or(entry.anonymous),
        manual_override_prio: merged.manual_override,
        final_prio,
    };

    EntryRepository::new(state.pool.clone())
        .update(entry_id, record)
        .await?
        .ok_or_else(|| ApiError::NotFound("Entry not found".to_string()))?;

    let (entry, author) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    tracing::info!(
        entry_id = %entry_id,
        final_prio = entry.final_prio,
        "Entry updated"
    );

    Ok(Json(EntryResponse::new(entry, author)))
}

/// Soft-delete an entry. Creator or admin.
///
/// DELETE /api/v1/teams/:team_id/entries/:entry_id
pub async fn soft_delete_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    let (entry, _) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    if !access::can_soft_delete_entry(Some(&snapshot), entry_ref(&entry)) {
        return Err(ApiError::Forbidden(
            "Only the creator or a team admin can delete this entry".to_string(),
        ));
    }

    let deleted = EntryRepository::new(state.pool.clone())
        .soft_delete(entry_id)
        .await?;
    if !deleted {
        return Err(ApiError::Conflict("Entry is already deleted".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Restore a soft-deleted entry. Creator or admin.
///
/// POST /api/v1/teams/:team_id/entries/:entry_id/restore
pub async fn restore_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    let (entry, _) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    if !access::can_restore_entry(Some(&snapshot), entry_ref(&entry)) {
        return Err(ApiError::Forbidden(
            "Only the creator or a team admin can restore this entry".to_string(),
        ));
    }

    let restored = EntryRepository::new(state.pool.clone())
        .restore(entry_id)
        .await?;
    if !restored {
        return Err(ApiError::Conflict("Entry is not deleted".to_string()));
    }

    let (entry, author) = fetch_entry_in_team(&state, team_id, entry_id).await?;
    Ok(Json(EntryResponse::new(entry, author)))
}

/// Permanently remove an entry. Admin only.
///
/// DELETE /api/v1/teams/:team_id/entries/:entry_id/permanent
pub async fn hard_delete_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((team_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    let (entry, _) = fetch_entry_in_team(&state, team_id, entry_id).await?;

    if !access::can_hard_delete_entry(Some(&snapshot), entry_ref(&entry)) {
        return Err(ApiError::Forbidden(
            "Only team admins can permanently delete entries".to_string(),
        ));
    }

    EntryRepository::new(state.pool.clone())
        .hard_delete(entry_id)
        .await?;

    tracing::info!(entry_id = %entry_id, actor_id = %user.user_id, "Entry permanently deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Effort;

    fn entry() -> Entry {
        Entry {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            problem: "p".to_string(),
            solution: "s".to_string(),
            area: "ops".to_string(),
            time_saved_per_year: Some(300),
            gross_profit_per_year: Some(6000),
            effort: Some(Effort::Low),
            monetary_explanation: None,
            link: None,
            anonymous: false,
            manual_override_prio: 0,
            final_prio: 27,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_entry_ref_mirrors_entry() {
        let e = entry();
        let r = entry_ref(&e);
        assert_eq!(r.team_id, e.team_id);
        assert_eq!(r.creator_id, e.creator_id);
    }

    #[test]
    fn test_priority_untouched_update_keeps_final_prio() {
        let e = entry();
        let request = UpdateEntryRequest {
            solution: Some("better".to_string()),
            ..Default::default()
        };
        assert!(!request.touches_priority());

        let merged = PriorityInput::merged(&e, &request);
        let final_prio = if request.touches_priority() {
            compute_priority(merged)
        } else {
            e.final_prio
        };
        assert_eq!(final_prio, 27);
    }

    #[test]
    fn test_effort_change_recomputes() {
        let e = entry();
        let request = UpdateEntryRequest {
            effort: Some(Effort::High),
            ..Default::default()
        };
        assert!(request.touches_priority());
        assert_eq!(compute_priority(PriorityInput::merged(&e, &request)), 9);
    }
}
