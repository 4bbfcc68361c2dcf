//! Entry entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Effort, Entry, UserInfo};

/// Database enum for effort_level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "effort_level", rename_all = "lowercase")]
pub enum EffortDb {
    Low,
    Medium,
    High,
}

impl From<EffortDb> for Effort {
    fn from(db: EffortDb) -> Self {
        match db {
            EffortDb::Low => Self::Low,
            EffortDb::Medium => Self::Medium,
            EffortDb::High => Self::High,
        }
    }
}

impl From<Effort> for EffortDb {
    fn from(effort: Effort) -> Self {
        match effort {
            Effort::Low => Self::Low,
            Effort::Medium => Self::Medium,
            Effort::High => Self::High,
        }
    }
}

/// Row mapping for the entries table.
#[derive(Debug, Clone, FromRow)]
pub struct EntryEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub creator_id: Uuid,
    pub problem: String,
    pub solution: String,
    pub area: String,
    pub time_saved_per_year: Option<i64>,
    pub gross_profit_per_year: Option<i64>,
    pub effort: Option<EffortDb>,
    pub monetary_explanation: Option<String>,
    pub link: Option<String>,
    pub anonymous: bool,
    pub manual_override_prio: i64,
    pub final_prio: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EntryEntity> for Entry {
    fn from(entity: EntryEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            creator_id: entity.creator_id,
            problem: entity.problem,
            solution: entity.solution,
            area: entity.area,
            time_saved_per_year: entity.time_saved_per_year,
            gross_profit_per_year: entity.gross_profit_per_year,
            effort: entity.effort.map(Into::into),
            monetary_explanation: entity.monetary_explanation,
            link: entity.link,
            anonymous: entity.anonymous,
            manual_override_prio: entity.manual_override_prio,
            final_prio: entity.final_prio,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Entry row joined with the author's nickname for responses and export.
#[derive(Debug, Clone, FromRow)]
pub struct EntryWithAuthorEntity {
    #[sqlx(flatten)]
    pub entry: EntryEntity,
    pub author_nickname: String,
}

impl EntryWithAuthorEntity {
    /// Splits into the domain entry and its author info.
    pub fn into_parts(self) -> (Entry, UserInfo) {
        let author = UserInfo {
            id: self.entry.creator_id,
            nickname: self.author_nickname,
        };
        (self.entry.into(), author)
    }
}
