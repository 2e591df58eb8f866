use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for creating a team under an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    pub user_id: i64,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub is_individual: bool,
}

/// Request payload carrying the acting user for join/leave operations
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MembershipRequest {
    pub user_id: i64,
}

/// Response for a newly created team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamCreatedResponse {
    pub team_id: Uuid,
    pub name: String,
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
