use axum::{
    Json,
    extract::{Path, Query, State},
};
use storage::{
    Database,
    dto::event::{EventDetailResponse, EventSummaryResponse, PublicEventFilter},
    dto::registration::{RegistrationFilter, RegistrationResponse},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/public",
    params(
        ("vendor_id" = Option<i64>, Query, description = "Restrict to one vendor's events")
    ),
    responses(
        (status = 200, description = "Publicly visible events, soonest first", body = Vec<EventSummaryResponse>)
    ),
    tag = "events"
)]
pub async fn list_public_events(
    State(db): State<Database>,
    Query(filter): Query<PublicEventFilter>,
) -> Result<Json<Vec<EventSummaryResponse>>, WebError> {
    let events = services::list_public_events(db.pool(), &filter).await?;

    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event detail with live team count", body = EventDetailResponse),
        (status = 404, description = "Event not found or not visible")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, WebError> {
    let detail = services::get_event_detail(db.pool(), event_id).await?;

    Ok(Json(detail))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/registrations",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("status" = Option<String>, Query, description = "Filter by registration status")
    ),
    responses(
        (status = 200, description = "Registrations for the event in creation order", body = Vec<RegistrationResponse>),
        (status = 404, description = "Event not found or not visible")
    ),
    tag = "events"
)]
pub async fn list_event_registrations(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Json<Vec<RegistrationResponse>>, WebError> {
    let registrations = services::list_event_registrations(db.pool(), event_id, &filter).await?;

    Ok(Json(registrations))
}
