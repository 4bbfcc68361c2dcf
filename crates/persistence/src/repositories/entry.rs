//! Entry repository for database operations.

use domain::models::{Effort, Entry, ListEntriesQuery, UserInfo};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::entry::{EffortDb, EntryEntity, EntryWithAuthorEntity};

const ENTRY_COLUMNS: &str = "id, team_id, creator_id, problem, solution, area, \
     time_saved_per_year, gross_profit_per_year, effort, monetary_explanation, link, \
     anonymous, manual_override_prio, final_prio, deleted_at, created_at, updated_at";

/// Fully resolved column values for an entry write.
///
/// The caller merges partial updates and recomputes the priority before the
/// row is written, so the repository only ever stores complete values.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub problem: String,
    pub solution: String,
    pub area: String,
    pub time_saved_per_year: Option<i64>,
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<Effort>,
    pub monetary_explanation: Option<String>,
    pub link: Option<String>,
    pub anonymous: bool,
    pub manual_override_prio: i64,
    pub final_prio: i64,
}

/// Repository for entry database operations.
#[derive(Clone)]
pub struct EntryRepository {
    pool: PgPool,
}

impl EntryRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new entry.
    pub async fn create(
        &self,
        team_id: Uuid,
        creator_id: Uuid,
        record: EntryRecord,
    ) -> Result<Entry, sqlx::Error> {
        let entity = sqlx::query_as::<_, EntryEntity>(&format!(
            r#"
            INSERT INTO entries (team_id, creator_id, problem, solution, area,
                                 time_saved_per_year, gross_profit_per_year, effort,
                                 monetary_explanation, link, anonymous,
                                 manual_override_prio, final_prio)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(team_id)
        .bind(creator_id)
        .bind(&record.problem)
        .bind(&record.solution)
        .bind(&record.area)
        .bind(record.time_saved_per_year)
        .bind(record.gross_profit_per_year)
        .bind(record.effort.map(EffortDb::from))
        .bind(&record.monetary_explanation)
        .bind(&record.link)
        .bind(record.anonymous)
        .bind(record.manual_override_prio)
        .bind(record.final_prio)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Find an entry by ID, including soft-deleted rows.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>, sqlx::Error> {
        let entity = sqlx::query_as::<_, EntryEntity>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find an entry joined with its author.
    pub async fn find_with_author(
        &self,
        id: Uuid,
    ) -> Result<Option<(Entry, UserInfo)>, sqlx::Error> {
        let entity = sqlx::query_as::<_, EntryWithAuthorEntity>(
            r#"
            SELECT e.id, e.team_id, e.creator_id, e.problem, e.solution, e.area,
                   e.time_saved_per_year, e.gross_profit_per_year, e.effort,
                   e.monetary_explanation, e.link, e.anonymous,
                   e.manual_override_prio, e.final_prio, e.deleted_at,
                   e.created_at, e.updated_at,
                   u.nickname AS author_nickname
            FROM entries e
            JOIN users u ON u.id = e.creator_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(EntryWithAuthorEntity::into_parts))
    }

    /// List a team's entries with authors, highest priority first.
    ///
    /// Soft-deleted entries are excluded unless `include_deleted` is set.
    pub async fn list_with_authors(
        &self,
        team_id: Uuid,
        query: &ListEntriesQuery,
    ) -> Result<Vec<(Entry, UserInfo)>, sqlx::Error> {
        let entities = sqlx::query_as::<_, EntryWithAuthorEntity>(
            r#"
            SELECT e.id, e.team_id, e.creator_id, e.problem, e.solution, e.area,
                   e.time_saved_per_year, e.gross_profit_per_year, e.effort,
                   e.monetary_explanation, e.link, e.anonymous,
                   e.manual_override_prio, e.final_prio, e.deleted_at,
                   e.created_at, e.updated_at,
                   u.nickname AS author_nickname
            FROM entries e
            JOIN users u ON u.id = e.creator_id
            WHERE e.team_id = $1
              AND ($2 OR e.deleted_at IS NULL)
              AND ($3::TEXT IS NULL OR e.area = $3)
            ORDER BY e.final_prio DESC, e.created_at ASC
            "#,
        )
        .bind(team_id)
        .bind(query.include_deleted)
        .bind(query.area.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(entities
            .into_iter()
            .map(EntryWithAuthorEntity::into_parts)
            .collect())
    }

    /// Overwrite an entry with fully merged values and bump `updated_at`.
    pub async fn update(&self, id: Uuid, record: EntryRecord) -> Result<Option<Entry>, sqlx::Error> {
        let entity = sqlx::query_as::<_, EntryEntity>(&format!(
            r#"
            UPDATE entries
            SET problem = $2,
                solution = $3,
                area = $4,
                time_saved_per_year = $5,
                gross_profit_per_year = $6,
                effort = $7,
                monetary_explanation = $8,
                link = $9,
                anonymous = $10,
                manual_override_prio = $11,
                final_prio = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&record.problem)
        .bind(&record.solution)
        .bind(&record.area)
        .bind(record.time_saved_per_year)
        .bind(record.gross_profit_per_year)
        .bind(record.effort.map(EffortDb::from))
        .bind(&record.monetary_explanation)
        .bind(&record.link)
        .bind(record.anonymous)
        .bind(record.manual_override_prio)
        .bind(record.final_prio)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Soft-delete an entry. Already-deleted rows are untouched.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE entries SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted entry.
    pub async fn restore(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE entries SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove an entry.
    pub async fn hard_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
