use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;

use crate::payments::PaymentGateway;

/// Shared application state: database handle plus the configured payment
/// gateway. Constructed once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub gateway: Arc<dyn PaymentGateway>,
    pub default_currency: String,
}

impl AppState {
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>, default_currency: String) -> Self {
        Self {
            db,
            gateway,
            default_currency,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Database {
        state.db.clone()
    }
}
