use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::PaymentConfig;

pub mod mock;
pub mod razorpay;
pub mod stripe;

pub use mock::MockGateway;
pub use razorpay::RazorpayGateway;
pub use stripe::StripeGateway;

/// Terminal payment outcomes a webhook can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// Result of webhook verification. Fails closed: anything that cannot be
/// authenticated or parsed is `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookVerification {
    Invalid,
    Valid {
        registration_id: Option<Uuid>,
        outcome: PaymentOutcome,
    },
}

/// Client-facing payment intent descriptor. Provider-specific fields are
/// optional; `metadata` is echoed back unchanged.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentIntent {
    #[schema(value_type = String)]
    pub provider: &'static str,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} provider is not configured")]
    NotConfigured(&'static str),

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected the request: {0}")]
    Provider(String),
}

/// Contract the registration core depends on. The core behaves identically
/// against any implementation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create a client-facing payment intent/order for the given amount.
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: Value,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Authenticate a webhook delivery and extract its terminal outcome.
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> WebhookVerification;
}

/// Build the gateway selected by `PAYMENT_PROVIDER`.
pub fn from_config(config: &PaymentConfig) -> anyhow::Result<Arc<dyn PaymentGateway>> {
    match config.provider.as_str() {
        "razorpay" => Ok(Arc::new(RazorpayGateway::from_config(config)?)),
        "stripe" => Ok(Arc::new(StripeGateway::from_config(config)?)),
        "mock" => Ok(Arc::new(MockGateway)),
        other => anyhow::bail!("unknown payment provider: {other}"),
    }
}

/// Amount in the provider's smallest unit (paise/cents).
pub(crate) fn smallest_unit(amount: Decimal) -> i64 {
    (amount * Decimal::from(100)).round().to_i64().unwrap_or(0)
}

/// Pull a registration id out of a metadata/notes object, tolerating both
/// string and missing values.
pub(crate) fn registration_id_from(value: &Value) -> Option<Uuid> {
    value
        .get("registration_id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_unit_rounds_to_paise() {
        assert_eq!(smallest_unit(Decimal::new(19900, 2)), 19900);
        assert_eq!(smallest_unit(Decimal::from(150)), 15000);
        assert_eq!(smallest_unit(Decimal::new(9999, 4)), 100);
    }

    #[test]
    fn registration_id_extraction_tolerates_bad_values() {
        let id = Uuid::new_v4();
        let good = serde_json::json!({ "registration_id": id.to_string() });
        assert_eq!(registration_id_from(&good), Some(id));

        let not_a_uuid = serde_json::json!({ "registration_id": "abc" });
        assert_eq!(registration_id_from(&not_a_uuid), None);

        let missing = serde_json::json!({});
        assert_eq!(registration_id_from(&missing), None);
    }
}
