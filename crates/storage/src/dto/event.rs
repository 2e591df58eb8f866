use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Event;

/// Query parameters for the public event listing
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PublicEventFilter {
    pub vendor_id: Option<i64>,
}

/// Summary of a publicly visible event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventSummaryResponse {
    pub id: Uuid,
    pub vendor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub registration_fee: Decimal,
    pub currency: String,
}

impl From<Event> for EventSummaryResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            vendor_id: e.vendor_id,
            title: e.title,
            description: e.description,
            start_at: e.start_at,
            end_at: e.end_at,
            registration_fee: e.registration_fee,
            currency: e.currency,
        }
    }
}

/// Full event detail including the live team count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDetailResponse {
    pub id: Uuid,
    pub vendor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub registration_fee: Decimal,
    pub currency: String,
    pub capacity_team: Option<i32>,
    pub capacity_player: Option<i32>,
    pub team_count: i64,
    pub allow_solo: bool,
    pub min_team_size: i32,
    pub max_team_size: i32,
}

impl EventDetailResponse {
    pub fn from_event(e: Event, team_count: i64) -> Self {
        Self {
            id: e.id,
            vendor_id: e.vendor_id,
            title: e.title,
            description: e.description,
            start_at: e.start_at,
            end_at: e.end_at,
            registration_fee: e.registration_fee,
            currency: e.currency,
            capacity_team: e.capacity_team,
            capacity_player: e.capacity_player,
            team_count,
            allow_solo: e.allow_solo,
            min_team_size: e.min_team_size,
            max_team_size: e.max_team_size,
        }
    }
}
