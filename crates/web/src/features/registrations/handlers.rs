use axum::{
    Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::registration::{RegistrationResponse, SubmitWaiverRequest, WaiverResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::AppJson;

use super::services;

#[utoipa::path(
    get,
    path = "/api/registrations/{registration_id}",
    params(
        ("registration_id" = Uuid, Path, description = "Registration id")
    ),
    responses(
        (status = 200, description = "Registration detail", body = RegistrationResponse),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn get_registration(
    State(db): State<Database>,
    Path(registration_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, WebError> {
    let registration = services::get_registration(db.pool(), registration_id).await?;

    Ok(Json(registration))
}

#[utoipa::path(
    post,
    path = "/api/registrations/{registration_id}/waiver",
    params(
        ("registration_id" = Uuid, Path, description = "Registration id")
    ),
    request_body = SubmitWaiverRequest,
    responses(
        (status = 200, description = "Waiver signed", body = WaiverResponse),
        (status = 400, description = "Waiver not accepted or missing fields"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Waiver already signed")
    ),
    tag = "registrations"
)]
pub async fn submit_waiver(
    State(db): State<Database>,
    Path(registration_id): Path<Uuid>,
    AppJson(req): AppJson<SubmitWaiverRequest>,
) -> Result<Json<WaiverResponse>, WebError> {
    req.validate()?;

    let response = services::submit_waiver(db.pool(), registration_id, &req).await?;

    Ok(Json(response))
}
