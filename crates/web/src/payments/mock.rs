use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{
    GatewayError, PaymentGateway, PaymentIntent, PaymentOutcome, WebhookVerification,
    registration_id_from,
};

/// Deterministic in-process provider for development and tests. Webhook
/// payloads are trusted as long as they parse; there is no signature secret.
pub struct MockGateway;

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: Value,
    ) -> Result<PaymentIntent, GatewayError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Ok(PaymentIntent {
            provider: self.name(),
            amount,
            currency: currency.to_string(),
            client_secret: Some(format!("mock_cs_{now}")),
            order_id: None,
            payment_intent: None,
            key: None,
            metadata,
            status: "requires_payment_method".to_string(),
        })
    }

    fn verify_webhook(&self, payload: &[u8], _signature: &str) -> WebhookVerification {
        let Ok(event) = serde_json::from_slice::<Value>(payload) else {
            return WebhookVerification::Invalid;
        };

        // registration_id and status may sit at the top level or under "data".
        let registration_id = registration_id_from(&event)
            .or_else(|| event.get("data").and_then(|d| registration_id_from(d)));

        let status = event
            .get("status")
            .or_else(|| event.get("data").and_then(|d| d.get("status")))
            .and_then(Value::as_str)
            .unwrap_or("succeeded");

        let outcome = if status == "succeeded" {
            PaymentOutcome::Succeeded
        } else {
            PaymentOutcome::Failed
        };

        WebhookVerification::Valid {
            registration_id,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn intent_echoes_metadata_and_carries_a_client_secret() {
        let metadata = serde_json::json!({ "event_id": "e1", "user_id": 42 });
        let intent = MockGateway
            .create_intent(Decimal::new(19900, 2), "INR", metadata.clone())
            .await
            .unwrap();

        assert_eq!(intent.provider, "mock");
        assert_eq!(intent.metadata, metadata);
        assert!(intent.client_secret.unwrap().starts_with("mock_cs_"));
        assert_eq!(intent.status, "requires_payment_method");
    }

    #[test]
    fn verify_reads_top_level_fields() {
        let id = Uuid::new_v4();
        let payload =
            serde_json::json!({ "registration_id": id.to_string(), "status": "succeeded" });
        let verdict = MockGateway.verify_webhook(payload.to_string().as_bytes(), "");

        assert_eq!(
            verdict,
            WebhookVerification::Valid {
                registration_id: Some(id),
                outcome: PaymentOutcome::Succeeded,
            }
        );
    }

    #[test]
    fn verify_reads_nested_data_fields() {
        let id = Uuid::new_v4();
        let payload = serde_json::json!({
            "data": { "registration_id": id.to_string(), "status": "failed" }
        });
        let verdict = MockGateway.verify_webhook(payload.to_string().as_bytes(), "");

        assert_eq!(
            verdict,
            WebhookVerification::Valid {
                registration_id: Some(id),
                outcome: PaymentOutcome::Failed,
            }
        );
    }

    #[test]
    fn malformed_payload_fails_closed() {
        assert_eq!(
            MockGateway.verify_webhook(b"not json", "whatever"),
            WebhookVerification::Invalid
        );
    }
}
