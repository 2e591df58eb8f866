use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde_json::Value;
use sha2::Sha256;

use super::{
    GatewayError, PaymentGateway, PaymentIntent, PaymentOutcome, WebhookVerification,
    registration_id_from, smallest_unit,
};
use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Stripe adapter: PaymentIntent creation over the REST API, webhook
/// authentication via Stripe's `t=...,v1=...` signature scheme.
pub struct StripeGateway {
    secret_key: String,
    webhook_secret: String,
    http: reqwest::Client,
}

impl StripeGateway {
    pub fn from_config(config: &PaymentConfig) -> anyhow::Result<Self> {
        let secret_key = config
            .stripe_secret_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("STRIPE_SECRET_KEY is not set"))?;
        let webhook_secret = config
            .stripe_webhook_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("STRIPE_WEBHOOK_SECRET is not set"))?;

        Ok(Self {
            secret_key,
            webhook_secret,
            http: reqwest::Client::new(),
        })
    }

    #[cfg(test)]
    fn with_secrets(secret_key: &str, webhook_secret: &str) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Check a `Stripe-Signature` style header: HMAC-SHA256 of
    /// `"{timestamp}.{payload}"` against any of the `v1` entries.
    fn signature_matches(&self, payload: &[u8], header: &str) -> bool {
        let mut timestamp = None;
        let mut candidates = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => candidates.push(value),
                _ => {}
            }
        }

        let Some(timestamp) = timestamp else {
            return false;
        };

        candidates.iter().any(|candidate| {
            let Ok(expected) = hex::decode(candidate) else {
                return false;
            };
            let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
                .expect("HMAC accepts any key length");
            mac.update(timestamp.as_bytes());
            mac.update(b".");
            mac.update(payload);
            mac.verify_slice(&expected).is_ok()
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: Value,
    ) -> Result<PaymentIntent, GatewayError> {
        let mut form = vec![
            ("amount".to_string(), smallest_unit(amount).to_string()),
            ("currency".to_string(), currency.to_lowercase()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(entries) = metadata.as_object() {
            for (key, value) in entries {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form.push((format!("metadata[{key}]"), rendered));
            }
        }

        let response = self
            .http
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!("{status}: {detail}")));
        }

        let intent: Value = response.json().await?;
        let intent_id = intent
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Provider("intent response missing id".into()))?
            .to_string();
        let client_secret = intent
            .get("client_secret")
            .and_then(Value::as_str)
            .map(str::to_string);
        let status = intent
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("requires_payment_method")
            .to_string();

        Ok(PaymentIntent {
            provider: self.name(),
            amount,
            currency: currency.to_string(),
            client_secret,
            order_id: None,
            payment_intent: Some(intent_id),
            key: None,
            metadata,
            status,
        })
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> WebhookVerification {
        if !self.signature_matches(payload, signature) {
            return WebhookVerification::Invalid;
        }

        let Ok(event) = serde_json::from_slice::<Value>(payload) else {
            return WebhookVerification::Invalid;
        };

        let registration_id = event
            .pointer("/data/object/metadata")
            .and_then(|metadata| registration_id_from(metadata));

        let outcome = match event.get("type").and_then(Value::as_str) {
            Some("payment_intent.succeeded") => PaymentOutcome::Succeeded,
            _ => PaymentOutcome::Failed,
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

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn gateway() -> StripeGateway {
        StripeGateway::with_secrets("sk_test", "whsec_stripe")
    }

    #[test]
    fn succeeded_intent_verifies() {
        let id = Uuid::new_v4();
        let payload = serde_json::json!({
            "type": "payment_intent.succeeded",
            "data": { "object": { "metadata": { "registration_id": id.to_string() } } }
        })
        .to_string();

        let header = sign("whsec_stripe", "1700000000", payload.as_bytes());
        let verdict = gateway().verify_webhook(payload.as_bytes(), &header);

        assert_eq!(
            verdict,
            WebhookVerification::Valid {
                registration_id: Some(id),
                outcome: PaymentOutcome::Succeeded,
            }
        );
    }

    #[test]
    fn payment_failed_event_maps_to_failed() {
        let payload = serde_json::json!({
            "type": "payment_intent.payment_failed",
            "data": { "object": { "metadata": {} } }
        })
        .to_string();

        let header = sign("whsec_stripe", "1700000000", payload.as_bytes());
        let verdict = gateway().verify_webhook(payload.as_bytes(), &header);

        assert_eq!(
            verdict,
            WebhookVerification::Valid {
                registration_id: None,
                outcome: PaymentOutcome::Failed,
            }
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = sign("whsec_stripe", "1700000000", payload);
        assert_eq!(
            gateway().verify_webhook(br#"{"type":"tampered"}"#, &header),
            WebhookVerification::Invalid
        );
    }

    #[test]
    fn header_without_timestamp_is_rejected() {
        assert_eq!(
            gateway().verify_webhook(b"{}", "v1=deadbeef"),
            WebhookVerification::Invalid
        );
    }
}
