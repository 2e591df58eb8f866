use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod payments;
pub mod state;

pub use state::AppState;

/// Assemble the API router. Swagger UI is layered on in `main`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest(
            "/api/events",
            features::events::routes().merge(features::participation::routes()),
        )
        .nest("/api/payments", features::payments::routes())
        .nest("/api/registrations", features::registrations::routes())
        .layer(cors)
        .with_state(state)
}
