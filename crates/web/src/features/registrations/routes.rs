use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_registration, submit_waiver};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:registration_id", get(get_registration))
        .route("/:registration_id/waiver", post(submit_waiver))
}
