use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Payment settlement states for a registration.
pub mod payment_status {
    pub const PENDING: &str = "pending";
    pub const PAID: &str = "paid";
    pub const FAILED: &str = "failed";
}

/// Overall registration states.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
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

impl Registration {
    pub fn is_confirmed(&self) -> bool {
        self.status == status::CONFIRMED
    }
}
