use axum::{Router, routing::get};

use super::handlers::{get_event, list_event_registrations, list_public_events};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/public", get(list_public_events))
        .route("/:event_id", get(get_event))
        .route("/:event_id/registrations", get(list_event_registrations))
}
