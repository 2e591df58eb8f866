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

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Razorpay adapter: order creation over the REST API, webhook
/// authentication via HMAC-SHA256 over the raw body.
pub struct RazorpayGateway {
    key_id: String,
    key_secret: String,
    webhook_secret: String,
    http: reqwest::Client,
}

impl RazorpayGateway {
    pub fn from_config(config: &PaymentConfig) -> anyhow::Result<Self> {
        let key_id = config
            .razorpay_key_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("RAZORPAY_KEY_ID is not set"))?;
        let key_secret = config
            .razorpay_key_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("RAZORPAY_KEY_SECRET is not set"))?;
        let webhook_secret = config
            .razorpay_webhook_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("RAZORPAY_WEBHOOK_SECRET is not set"))?;

        Ok(Self {
            key_id,
            key_secret,
            webhook_secret,
            http: reqwest::Client::new(),
        })
    }

    #[cfg(test)]
    fn with_secrets(key_id: &str, key_secret: &str, webhook_secret: &str) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            webhook_secret: webhook_secret.into(),
            http: reqwest::Client::new(),
        }
    }

    fn signature_matches(&self, payload: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: Value,
    ) -> Result<PaymentIntent, GatewayError> {
        let receipt = metadata
            .get("registration_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("rcpt_{}", smallest_unit(amount)));

        let body = serde_json::json!({
            "amount": smallest_unit(amount),
            "currency": currency,
            "receipt": receipt,
            "notes": metadata,
        });

        let response = self
            .http
            .post(ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!("{status}: {detail}")));
        }

        let order: Value = response.json().await?;
        let order_id = order
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Provider("order response missing id".into()))?
            .to_string();

        Ok(PaymentIntent {
            provider: self.name(),
            amount,
            currency: currency.to_string(),
            client_secret: None,
            order_id: Some(order_id),
            payment_intent: None,
            key: Some(self.key_id.clone()),
            metadata,
            status: "requires_payment_method".to_string(),
        })
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> WebhookVerification {
        if !self.signature_matches(payload, signature) {
            return WebhookVerification::Invalid;
        }

        let Ok(event) = serde_json::from_slice::<Value>(payload) else {
            return WebhookVerification::Invalid;
        };

        // registration_id travels in the order/payment entity's notes.
        let entity = event
            .pointer("/payload/payment/entity")
            .or_else(|| event.pointer("/payload/order/entity"));
        let registration_id = entity
            .and_then(|e| e.get("notes"))
            .and_then(|notes| registration_id_from(notes));

        let outcome = match event.get("event").and_then(Value::as_str) {
            Some("payment.captured") | Some("order.paid") => PaymentOutcome::Succeeded,
            _ => PaymentOutcome::Failed,
        };

        WebhookVerification::Valid {
            registration_id,
            outcome,
        }
    }
}
