use sqlx::PgPool;
use storage::{error::StorageError, models::Registration, repository::RegistrationRepository};

use crate::error::{WebError, WebResult};
use crate::payments::{PaymentGateway, PaymentOutcome, WebhookVerification};

/// Reconcile a registration's payment state from a webhook delivery.
/// Verification failures never touch state; re-delivery of the same
/// terminal event lands on the same row values.
pub async fn process_webhook(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    payload: &[u8],
    signature: &str,
) -> WebResult<Registration> {
    let (registration_id, outcome) = match gateway.verify_webhook(payload, signature) {
        WebhookVerification::Invalid => {
            tracing::warn!(provider = gateway.name(), "rejected webhook signature");
            return Err(WebError::bad_request("invalid_signature", "invalid signature"));
        }
        WebhookVerification::Valid {
            registration_id,
            outcome,
        } => (registration_id, outcome),
    };

    let registration_id =
        registration_id.ok_or_else(|| WebError::not_found("registration_not_found"))?;

    let succeeded = outcome == PaymentOutcome::Succeeded;
    RegistrationRepository::new(pool)
        .apply_payment_outcome(registration_id, succeeded)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::not_found("registration_not_found"),
            other => other.into(),
        })
}
