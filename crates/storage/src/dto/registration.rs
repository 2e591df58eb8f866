use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Registration;

/// Request payload for registering a team to an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterTeamRequest {
    pub user_id: i64,

    pub team_id: Uuid,

    #[validate(length(max = 120))]
    pub contact_name: Option<String>,

    #[validate(length(max = 32))]
    pub contact_phone: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[serde(default)]
    pub waiver_signed: bool,
}

/// Request payload for signing a registration waiver
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitWaiverRequest {
    pub accepted: bool,

    #[validate(length(
        min = 1,
        max = 120,
        message = "signed_by must be between 1 and 120 characters"
    ))]
    pub signed_by: String,
}

/// Response after signing a waiver
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WaiverResponse {
    pub registration_id: Uuid,
    pub waiver_signed: bool,
    pub signed_by: String,
    pub status: String,
}

/// Query parameters for listing an event's registrations
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegistrationFilter {
    pub status: Option<String>,
}

/// Response containing registration details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub team_id: Uuid,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub waiver_signed: bool,
    pub payment_status: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            team_id: r.team_id,
            contact_name: r.contact_name,
            contact_phone: r.contact_phone,
            contact_email: r.contact_email,
            waiver_signed: r.waiver_signed,
            payment_status: r.payment_status,
            status: r.status,
            notes: r.notes,
            created_at: r.created_at,
        }
    }
}
