use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::event::PublicEventFilter;
use crate::error::{Result, StorageError};
use crate::models::Event;
use crate::models::event::status;

const EVENT_COLUMNS: &str = "id, vendor_id, title, description, start_at, end_at, \
     registration_fee, currency, registration_deadline, capacity_team, capacity_player, \
     min_team_size, max_team_size, allow_solo, status, visibility, created_at, updated_at";

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List visible events that are open to the public (published or ongoing),
    /// soonest first.
    pub async fn list_public(&self, filter: &PublicEventFilter) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE visibility = TRUE
              AND status IN ($1, $2)
              AND ($3::bigint IS NULL OR vendor_id = $3)
            ORDER BY start_at ASC
            "#
        ))
        .bind(status::PUBLISHED)
        .bind(status::ONGOING)
        .bind(filter.vendor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    /// Get a visible event by id
    pub async fn find_visible(&self, id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1 AND visibility = TRUE
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Get a visible, published event by id
    pub async fn find_published(&self, id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1 AND visibility = TRUE AND status = $2
            "#
        ))
        .bind(id)
        .bind(status::PUBLISHED)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Count teams created under an event
    pub async fn team_count(&self, id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE event_id = $1")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Lock a visible, published event's row for the rest of the transaction.
    /// Serializes capacity check-and-insert across concurrent registrations.
    pub async fn lock_published(conn: &mut PgConnection, id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1 AND visibility = TRUE AND status = $2
            FOR UPDATE
            "#
        ))
        .bind(id)
        .bind(status::PUBLISHED)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }
}
