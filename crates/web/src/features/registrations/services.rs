use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::registration::{RegistrationResponse, SubmitWaiverRequest, WaiverResponse},
    error::StorageError,
    repository::RegistrationRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

fn registration_not_found(e: StorageError) -> WebError {
    match e {
        StorageError::NotFound => WebError::not_found("registration_not_found"),
        other => other.into(),
    }
}

/// Get a registration by id
pub async fn get_registration(
    pool: &PgPool,
    registration_id: Uuid,
) -> WebResult<RegistrationResponse> {
    let registration = RegistrationRepository::new(pool)
        .find(registration_id)
        .await
        .map_err(registration_not_found)?;

    Ok(RegistrationResponse::from(registration))
}

/// Sign the waiver for a registration, once.
pub async fn submit_waiver(
    pool: &PgPool,
    registration_id: Uuid,
    req: &SubmitWaiverRequest,
) -> WebResult<WaiverResponse> {
    if !req.accepted {
        return Err(WebError::bad_request(
            "waiver_not_accepted",
            "waiver must be accepted",
        ));
    }

    let repo = RegistrationRepository::new(pool);

    let existing = repo.find(registration_id).await.map_err(registration_not_found)?;
    if existing.waiver_signed {
        return Err(WebError::conflict(
            "waiver_already_signed",
            "waiver already signed for this registration",
        ));
    }

    let note = format!("\nWaiver signed by {} at {}", req.signed_by, Utc::now());
    let updated = repo
        .mark_waiver_signed(registration_id, &note)
        .await
        .map_err(|e| match e {
            // The row existed a moment ago, so a miss means a concurrent
            // signer got there first.
            StorageError::NotFound => WebError::conflict(
                "waiver_already_signed",
                "waiver already signed for this registration",
            ),
            other => other.into(),
        })?;

    Ok(WaiverResponse {
        registration_id: updated.id,
        waiver_signed: updated.waiver_signed,
        signed_by: req.signed_by.clone(),
        status: updated.status,
    })
}
