//! Team repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::Team;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::team::TeamEntity;

const TEAM_COLUMNS: &str =
    "id, name, team_code, invite_token, invite_token_expires_at, founder_id, settings, created_at";

/// Repository for team database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a team and its founder membership in one transaction.
    ///
    /// The founder becomes an admin member of the new team.
    pub async fn create(
        &self,
        name: &str,
        team_code: &str,
        founder_id: Uuid,
        settings: JsonValue,
    ) -> Result<Team, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, TeamEntity>(
            r#"
            INSERT INTO teams (name, team_code, founder_id, settings)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, team_code, invite_token, invite_token_expires_at,
                      founder_id, settings, created_at
            "#,
        )
        .bind(name)
        .bind(team_code)
        .bind(founder_id)
        .bind(settings)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (team_id, user_id, is_admin)
            VALUES ($1, $2, TRUE)
            "#,
        )
        .bind(entity.id)
        .bind(founder_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(entity.into())
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find a team by its permanent join code.
    pub async fn find_by_code(&self, team_code: &str) -> Result<Option<Team>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE team_code = $1"
        ))
        .bind(team_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find a team by a non-expired invite token.
    pub async fn find_by_invite_token(
        &self,
        invite_token: &str,
    ) -> Result<Option<Team>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams
            WHERE invite_token = $1
              AND invite_token_expires_at > NOW()
            "#
        ))
        .bind(invite_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Update team name and/or settings. Unset fields keep their value.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        settings: Option<JsonValue>,
    ) -> Result<Option<Team>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                settings = COALESCE($3, settings)
            WHERE id = $1
            RETURNING id, name, team_code, invite_token, invite_token_expires_at,
                      founder_id, settings, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(settings)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Store a freshly generated invite token and its expiry.
    pub async fn set_invite_token(
        &self,
        id: Uuid,
        invite_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Team>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TeamEntity>(
            r#"
            UPDATE teams
            SET invite_token = $2,
                invite_token_expires_at = $3
            WHERE id = $1
            RETURNING id, name, team_code, invite_token, invite_token_expires_at,
                      founder_id, settings, created_at
            "#,
        )
        .bind(id)
        .bind(invite_token)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Revoke the current invite token.
    pub async fn clear_invite_token(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET invite_token = NULL,
                invite_token_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a team. Memberships and entries cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a team code is already taken.
    pub async fn code_exists(&self, team_code: &str) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE team_code = $1)")
                .bind(team_code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
