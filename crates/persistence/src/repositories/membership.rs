//! Membership repository for database operations.

use domain::models::{MemberWithDetails, Membership, MembershipSnapshot};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::membership::{
    MemberWithDetailsEntity, MembershipEntity, MembershipSnapshotEntity,
};

/// Repository for membership database operations.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a user to a team.
    pub async fn create(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
    ) -> Result<Membership, sqlx::Error> {
        let entity = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO memberships (team_id, user_id, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, team_id, user_id, is_admin, joined_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Resolve the actor's role snapshot within a team.
    ///
    /// `is_founder` is computed against the team's founder column, so it
    /// survives role changes on the membership row itself.
    pub async fn snapshot(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipSnapshot>, sqlx::Error> {
        let entity = sqlx::query_as::<_, MembershipSnapshotEntity>(
            r#"
            SELECT m.user_id, m.team_id, m.is_admin,
                   (t.founder_id = m.user_id) AS is_founder
            FROM memberships m
            JOIN teams t ON t.id = m.team_id
            WHERE m.team_id = $1 AND m.user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Check whether a user is a member of a team.
    pub async fn exists(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM memberships WHERE team_id = $1 AND user_id = $2)",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// List all members of a team with user details, founders first.
    pub async fn list_with_details(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<MemberWithDetails>, sqlx::Error> {
        let entities = sqlx::query_as::<_, MemberWithDetailsEntity>(
            r#"
            SELECT m.user_id, u.nickname AS user_nickname, m.is_admin,
                   (t.founder_id = m.user_id) AS is_founder,
                   m.joined_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            JOIN teams t ON t.id = m.team_id
            WHERE m.team_id = $1
            ORDER BY is_founder DESC, m.joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Set or clear the admin flag on a membership.
    pub async fn set_admin(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let entity = sqlx::query_as::<_, MembershipEntity>(
            r#"
            UPDATE memberships
            SET is_admin = $3
            WHERE team_id = $1 AND user_id = $2
            RETURNING id, team_id, user_id, is_admin, joined_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Remove a user from a team.
    pub async fn delete(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
