use axum::{Router, routing::post};

use super::handlers::{create_intent, payment_webhook};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/intent", post(create_intent))
        .route("/webhook", post(payment_webhook))
}
