use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use storage::dto::registration::RegisterTeamRequest;
use storage::dto::team::{CreateTeamRequest, MembershipRequest, OkResponse, TeamCreatedResponse};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::AppJson;
use crate::payments::PaymentIntent;
use crate::state::AppState;

use super::services;

/// Response for a successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub registration_id: Uuid,
    pub payment_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentIntent>,
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/teams",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created, requester is captain", body = TeamCreatedResponse),
        (status = 400, description = "Missing field or solo-format mismatch"),
        (status = 404, description = "Event not found or not published"),
        (status = 409, description = "Team name already exists for this event")
    ),
    tag = "participation"
)]
pub async fn create_team(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    AppJson(req): AppJson<CreateTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::create_team(state.db.pool(), event_id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamCreatedResponse {
            team_id: team.id,
            name: team.team_name,
        }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/teams/{team_id}/join",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("team_id" = Uuid, Path, description = "Team id")
    ),
    request_body = MembershipRequest,
    responses(
        (status = 201, description = "Joined the team", body = OkResponse),
        (status = 400, description = "Individual team or team already full"),
        (status = 404, description = "Event or team not found"),
        (status = 409, description = "Already a member")
    ),
    tag = "participation"
)]
pub async fn join_team(
    State(state): State<AppState>,
    Path((event_id, team_id)): Path<(Uuid, Uuid)>,
    AppJson(req): AppJson<MembershipRequest>,
) -> Result<Response, WebError> {
    services::join_team(state.db.pool(), event_id, team_id, req.user_id).await?;

    Ok((StatusCode::CREATED, Json(OkResponse::ok())).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/teams/{team_id}/leave",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("team_id" = Uuid, Path, description = "Team id")
    ),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "Left the team", body = OkResponse),
        (status = 400, description = "Captain cannot leave a crewed team"),
        (status = 404, description = "Event not found or not a member")
    ),
    tag = "participation"
)]
pub async fn leave_team(
    State(state): State<AppState>,
    Path((event_id, team_id)): Path<(Uuid, Uuid)>,
    AppJson(req): AppJson<MembershipRequest>,
) -> Result<Response, WebError> {
    services::leave_team(state.db.pool(), event_id, team_id, req.user_id).await?;

    Ok(Json(OkResponse::ok()).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/register",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = RegisterTeamRequest,
    responses(
        (status = 201, description = "Registration created", body = RegisterResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 403, description = "Requester is not a team member"),
        (status = 404, description = "Event or team not found"),
        (status = 409, description = "Already registered or capacity reached"),
        (status = 502, description = "Payment provider unavailable")
    ),
    tag = "participation"
)]
pub async fn register_team(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    AppJson(req): AppJson<RegisterTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let outcome =
        services::register_team(state.db.pool(), state.gateway.as_ref(), event_id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            registration_id: outcome.registration.id,
            payment_required: outcome.payment.is_some(),
            payment: outcome.payment,
        }),
    )
        .into_response())
}
