use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::registration::RegistrationFilter;
use crate::error::{Result, StorageError};
use crate::models::Registration;
use crate::models::registration::{payment_status, status};

const REGISTRATION_COLUMNS: &str = "id, event_id, team_id, contact_name, contact_phone, \
     contact_email, waiver_signed, payment_status, status, notes, created_at";

/// Fields for a new registration row
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub team_id: Uuid,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub waiver_signed: bool,
    /// Whether the event carries a fee; decides the initial states.
    pub requires_payment: bool,
}

/// Repository for Registration database operations
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a registration by id
    pub async fn find(&self, id: Uuid) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM registrations
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// List an event's registrations in creation order, optionally filtered
    /// by status
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        filter: &RegistrationFilter,
    ) -> Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM registrations
            WHERE event_id = $1
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#
        ))
        .bind(event_id)
        .bind(filter.status.as_deref())
        .fetch_all(self.pool)
        .await?;

        Ok(registrations)
    }

    /// Apply a terminal payment outcome reported by the gateway. A repeated
    /// delivery overwrites the row with the same values, so the operation is
    /// idempotent by construction.
    pub async fn apply_payment_outcome(&self, id: Uuid, succeeded: bool) -> Result<Registration> {
        let (payment, overall) = if succeeded {
            (payment_status::PAID, status::CONFIRMED)
        } else {
            (payment_status::FAILED, status::PENDING)
        };

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET payment_status = $2, status = $3
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payment)
        .bind(overall)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Mark the waiver signed, appending an audit note. Returns `NotFound`
    /// when the row is absent or the waiver was already signed; the caller
    /// disambiguates with a prior `find`.
    pub async fn mark_waiver_signed(&self, id: Uuid, note: &str) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET waiver_signed = TRUE,
                notes = COALESCE(notes, '') || $2
            WHERE id = $1 AND waiver_signed = FALSE
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(note)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Whether a team already holds a registration for an event. Runs on the
    /// caller's transaction so the answer is stable under the event-row lock.
    pub async fn exists(conn: &mut PgConnection, event_id: Uuid, team_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE event_id = $1 AND team_id = $2)",
        )
        .bind(event_id)
        .bind(team_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Count teams holding a registration for an event. Runs on the caller's
    /// transaction so the count is stable under the event-row lock.
    pub async fn registered_team_count(conn: &mut PgConnection, event_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(conn)
                .await?;

        Ok(count)
    }

    /// Count players across all teams already registered for an event.
    pub async fn registered_player_count(conn: &mut PgConnection, event_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM team_members tm
            JOIN registrations r ON r.team_id = tm.team_id
            WHERE r.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    /// Insert a registration row on the caller's transaction. A duplicate
    /// (event, team) pair surfaces as a violation of
    /// `uq_registrations_event_team`.
    pub async fn insert(conn: &mut PgConnection, new: &NewRegistration) -> Result<Registration> {
        let (payment, overall) = if new.requires_payment {
            (payment_status::PENDING, status::PENDING)
        } else {
            (payment_status::PAID, status::CONFIRMED)
        };

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (
                event_id, team_id, contact_name, contact_phone, contact_email,
                waiver_signed, payment_status, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(new.event_id)
        .bind(new.team_id)
        .bind(new.contact_name.as_deref())
        .bind(new.contact_phone.as_deref())
        .bind(new.contact_email.as_deref())
        .bind(new.waiver_signed)
        .bind(payment)
        .bind(overall)
        .fetch_one(conn)
        .await
        .map_err(StorageError::from_db)?;

        Ok(registration)
    }
}
