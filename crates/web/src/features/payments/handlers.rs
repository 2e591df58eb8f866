use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use storage::dto::team::OkResponse;
use utoipa::ToSchema;

use crate::error::WebError;
use crate::extract::AppJson;
use crate::payments::PaymentIntent;
use crate::state::AppState;

use super::services;

/// Request payload for a standalone payment intent
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIntentRequest {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Option<Value>,
}

#[utoipa::path(
    post,
    path = "/api/payments/intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 201, description = "Payment intent created", body = PaymentIntent),
        (status = 400, description = "Missing amount"),
        (status = 502, description = "Payment provider unavailable")
    ),
    tag = "payments"
)]
pub async fn create_intent(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateIntentRequest>,
) -> Result<Response, WebError> {
    let amount = req
        .amount
        .ok_or_else(|| WebError::bad_request("missing_field", "amount required"))?;
    let currency = req.currency.unwrap_or_else(|| state.default_currency.clone());
    let metadata = req.metadata.unwrap_or_else(|| Value::Object(Default::default()));

    let intent = state
        .gateway
        .create_intent(amount, &currency, metadata)
        .await?;

    Ok((StatusCode::CREATED, Json(intent)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Webhook applied", body = OkResponse),
        (status = 400, description = "Invalid signature"),
        (status = 404, description = "Registration not found")
    ),
    tag = "payments"
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebError> {
    let signature = headers
        .get("X-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    services::process_webhook(state.db.pool(), state.gateway.as_ref(), &body, signature).await?;

    Ok(Json(OkResponse::ok()).into_response())
}
