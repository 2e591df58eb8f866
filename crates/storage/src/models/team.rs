use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub id: Uuid,
    pub event_id: Uuid,
    pub team_name: String,
    pub is_individual: bool,
    pub created_by_user: i64,
    pub created_at: DateTime<Utc>,
}
