use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Event lifecycle statuses.
pub mod status {
    pub const DRAFT: &str = "draft";
    pub const PUBLISHED: &str = "published";
    pub const ONGOING: &str = "ongoing";
    pub const COMPLETED: &str = "completed";
    pub const CANCELED: &str = "canceled";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub vendor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub registration_fee: Decimal,
    pub currency: String,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity_team: Option<i32>,
    pub capacity_player: Option<i32>,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub allow_solo: bool,
    pub status: String,
    pub visibility: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether registration carries a fee the client must settle.
    pub fn requires_payment(&self) -> bool {
        self.registration_fee > Decimal::ZERO
    }

    /// Solo-format events field exactly one player per team.
    pub fn is_solo_format(&self) -> bool {
        self.max_team_size == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(fee: Decimal, max_team_size: i32) -> Event {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        Event {
            id: Uuid::new_v4(),
            vendor_id: 1,
            title: "Valorant Night".into(),
            description: None,
            start_at: t,
            end_at: t,
            registration_fee: fee,
            currency: "INR".into(),
            registration_deadline: None,
            capacity_team: None,
            capacity_player: None,
            min_team_size: 1,
            max_team_size,
            allow_solo: false,
            status: status::PUBLISHED.into(),
            visibility: true,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn zero_fee_requires_no_payment() {
        assert!(!event(Decimal::ZERO, 5).requires_payment());
        assert!(event(Decimal::new(19900, 2), 5).requires_payment());
    }

    #[test]
    fn solo_format_is_max_team_size_one() {
        assert!(event(Decimal::ZERO, 1).is_solo_format());
        assert!(!event(Decimal::ZERO, 5).is_solo_format());
    }
}
