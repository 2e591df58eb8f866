use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Membership roles within a team.
pub mod role {
    pub const CAPTAIN: &str = "captain";
    pub const MEMBER: &str = "member";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamMember {
    pub team_id: Uuid,
    pub user_id: i64,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn is_captain(&self) -> bool {
        self.role == role::CAPTAIN
    }
}
