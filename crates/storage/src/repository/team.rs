use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Team, TeamMember};
use crate::models::team_member::role;

const TEAM_COLUMNS: &str = "id, event_id, team_name, is_individual, created_by_user, created_at";
const MEMBER_COLUMNS: &str = "team_id, user_id, role, joined_at";

/// Repository for Team and TeamMember database operations
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a team together with its captain membership in one transaction.
    /// A name collision within the event rolls the whole write back.
    pub async fn create_with_captain(
        &self,
        event_id: Uuid,
        name: &str,
        is_individual: bool,
        created_by_user: i64,
    ) -> Result<Team> {
        let mut tx = self.pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (event_id, team_name, is_individual, created_by_user)
            VALUES ($1, $2, $3, $4)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(name)
        .bind(is_individual)
        .bind(created_by_user)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::from_db)?;

        sqlx::query("INSERT INTO team_members (team_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(team.id)
            .bind(created_by_user)
            .bind(role::CAPTAIN)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from_db)?;

        tx.commit().await?;

        Ok(team)
    }

    /// Get a team by id, scoped to its event
    pub async fn find_in_event(&self, team_id: Uuid, event_id: Uuid) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            SELECT {TEAM_COLUMNS}
            FROM teams
            WHERE id = $1 AND event_id = $2
            "#
        ))
        .bind(team_id)
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(team)
    }

    /// Live member count for a team
    pub async fn member_count(&self, team_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Look up a user's membership row, if any
    pub async fn find_member(&self, team_id: Uuid, user_id: i64) -> Result<Option<TeamMember>> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#
        ))
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(member)
    }

    /// Add a member to a team. Duplicate (team, user) pairs surface as a
    /// constraint violation on `team_members_pkey`.
    pub async fn add_member(&self, team_id: Uuid, user_id: i64) -> Result<TeamMember> {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(team_id)
        .bind(user_id)
        .bind(role::MEMBER)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from_db)?;

        Ok(member)
    }

    /// Remove a membership row and, when it was the last one, the team
    /// itself, in a single transaction. Returns whether the team was
    /// deleted. `NotFound` when no such membership exists.
    pub async fn remove_member(&self, team_id: Uuid, user_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&mut *tx)
                .await?;

        let team_deleted = remaining == 0;
        if team_deleted {
            sqlx::query("DELETE FROM teams WHERE id = $1")
                .bind(team_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(team_deleted)
    }
}
