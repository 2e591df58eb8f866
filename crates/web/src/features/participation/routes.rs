use axum::{
    Router,
    routing::{delete, post},
};

use super::handlers::{create_team, join_team, leave_team, register_team};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:event_id/teams", post(create_team))
        .route("/:event_id/teams/:team_id/join", post(join_team))
        .route("/:event_id/teams/:team_id/leave", delete(leave_team))
        .route("/:event_id/register", post(register_team))
}
