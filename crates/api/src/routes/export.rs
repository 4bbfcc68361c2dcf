//! CSV export of a team's active entries.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use domain::models::{Entry, ListEntriesQuery, UserInfo};
use domain::services::access;
use persistence::repositories::EntryRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::routes::teams::member_snapshot;

/// Download a team's active entries as CSV. Any team member.
///
/// The file carries a UTF-8 BOM for Excel compatibility. Anonymous entries
/// export with an empty author column.
///
/// GET /api/v1/teams/:team_id/entries/export
pub async fn export_entries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(team_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = member_snapshot(&state, team_id, user.user_id).await?;
    if !access::can_list_entries(Some(&snapshot), team_id) {
        return Err(ApiError::Forbidden(
            "Only team members can export entries".to_string(),
        ));
    }

    let rows = EntryRepository::new(state.pool.clone())
        .list_with_authors(team_id, &ListEntriesQuery::default())
        .await?;

    let csv = generate_csv(&rows);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"entries-{}.csv\"", team_id);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ApiError::Internal("Invalid export filename".to_string()))?,
    );

    tracing::info!(team_id = %team_id, rows = rows.len(), "Entries exported");

    Ok((StatusCode::OK, headers, csv.into_bytes()))
}

/// Generate CSV from entries with resolved authors.
/// Includes UTF-8 BOM for Excel compatibility.
fn generate_csv(rows: &[(Entry, UserInfo)]) -> String {
    let mut csv = String::new();

    // UTF-8 BOM for Excel compatibility
    csv.push('\u{FEFF}');

    csv.push_str(
        "id,problem,solution,area,time_saved_per_year,gross_profit_per_year,effort,monetary_explanation,link,author,final_prio,created_at\n",
    );

    for (entry, author) in rows {
        let author_name = if entry.anonymous {
            ""
        } else {
            author.nickname.as_str()
        };
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            entry.id,
            escape_csv(&entry.problem),
            escape_csv(&entry.solution),
            escape_csv(&entry.area),
            entry
                .time_saved_per_year
                .map(|v| v.to_string())
                .unwrap_or_default(),
            entry
                .gross_profit_per_year
                .map(|v| v.to_string())
                .unwrap_or_default(),
            entry.effort.map(|e| e.to_string()).unwrap_or_default(),
            escape_csv(entry.monetary_explanation.as_deref().unwrap_or("")),
            escape_csv(entry.link.as_deref().unwrap_or("")),
            escape_csv(author_name),
            entry.final_prio,
            entry.created_at.to_rfc3339(),
        ));
    }

    csv
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Effort;

    fn row(anonymous: bool) -> (Entry, UserInfo) {
        let entry = Entry {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            problem: "Manual invoice matching, twice a week".to_string(),
            solution: "Automate via the ERP import".to_string(),
            area: "finance".to_string(),
            time_saved_per_year: Some(300),
            gross_profit_per_year: Some(6000),
            effort: Some(Effort::Low),
            monetary_explanation: None,
            link: None,
            anonymous,
            manual_override_prio: 0,
            final_prio: 27,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let author = UserInfo {
            id: entry.creator_id,
            nickname: "alice".to_string(),
        };
        (entry, author)
    }

    #[test]
    fn test_escape_csv_simple() {
        assert_eq!(escape_csv("hello"), "hello");
        assert_eq!(escape_csv("hello,world"), "\"hello,world\"");
        assert_eq!(escape_csv("hello\"world"), "\"hello\"\"world\"");
    }

    #[test]
    fn test_escape_csv_with_newline() {
        assert_eq!(escape_csv("hello\nworld"), "\"hello\nworld\"");
    }

    #[test]
    fn test_generate_csv_has_bom_and_header() {
        let csv = generate_csv(&[]);
        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.contains("id,problem,solution,area"));
    }

    #[test]
    fn test_generate_csv_quotes_commas() {
        let csv = generate_csv(&[row(false)]);
        assert!(csv.contains("\"Manual invoice matching, twice a week\""));
        assert!(csv.contains("alice"));
    }

    #[test]
    fn test_generate_csv_masks_anonymous_author() {
        let csv = generate_csv(&[row(true)]);
        assert!(!csv.contains("alice"));
    }
}
