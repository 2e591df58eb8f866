use sqlx::PgPool;
use storage::{
    dto::event::{EventDetailResponse, EventSummaryResponse, PublicEventFilter},
    dto::registration::{RegistrationFilter, RegistrationResponse},
    error::StorageError,
    repository::{EventRepository, RegistrationRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// List publicly visible events, soonest first
pub async fn list_public_events(
    pool: &PgPool,
    filter: &PublicEventFilter,
) -> WebResult<Vec<EventSummaryResponse>> {
    let repo = EventRepository::new(pool);
    let events = repo.list_public(filter).await?;

    Ok(events.into_iter().map(EventSummaryResponse::from).collect())
}

/// Get a visible event with its live team count
pub async fn get_event_detail(pool: &PgPool, event_id: Uuid) -> WebResult<EventDetailResponse> {
    let repo = EventRepository::new(pool);

    let event = repo.find_visible(event_id).await.map_err(|e| match e {
        StorageError::NotFound => WebError::not_found("event_not_found"),
        other => other.into(),
    })?;
    let team_count = repo.team_count(event_id).await?;

    Ok(EventDetailResponse::from_event(event, team_count))
}

/// List an event's registrations in creation order
pub async fn list_event_registrations(
    pool: &PgPool,
    event_id: Uuid,
    filter: &RegistrationFilter,
) -> WebResult<Vec<RegistrationResponse>> {
    let events = EventRepository::new(pool);
    events.find_visible(event_id).await.map_err(|e| match e {
        StorageError::NotFound => WebError::not_found("event_not_found"),
        other => other.into(),
    })?;

    let registrations = RegistrationRepository::new(pool)
        .list_for_event(event_id, filter)
        .await?;

    Ok(registrations
        .into_iter()
        .map(RegistrationResponse::from)
        .collect())
}
