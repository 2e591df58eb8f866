use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

use crate::payments::GatewayError;

/// Web layer errors. Every variant carries a stable `reason` code that
/// clients branch on, alongside the human-readable message.
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest { reason: &'static str, message: String },
    Forbidden { reason: &'static str, message: String },
    NotFound { reason: &'static str },
    Conflict { reason: &'static str, message: String },
    Gateway(GatewayError),
}

impl WebError {
    pub fn bad_request(reason: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            reason,
            message: message.into(),
        }
    }

    pub fn forbidden(reason: &'static str, message: impl Into<String>) -> Self {
        Self::Forbidden {
            reason,
            message: message.into(),
        }
    }

    pub fn not_found(reason: &'static str) -> Self {
        Self::NotFound { reason }
    }

    pub fn conflict(reason: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            reason,
            message: message.into(),
        }
    }

    /// The stable machine-checkable code, for variants that carry one.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::BadRequest { reason, .. }
            | Self::Forbidden { reason, .. }
            | Self::NotFound { reason }
            | Self::Conflict { reason, .. } => Some(reason),
            Self::Gateway(_) => Some("payment_gateway_unavailable"),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            Self::Forbidden { message, .. } => write!(f, "Forbidden: {}", message),
            Self::NotFound { reason } => write!(f, "Not found: {}", reason),
            Self::Conflict { message, .. } => write!(f, "Conflict: {}", message),
            Self::Gateway(e) => write!(f, "Payment gateway error: {}", e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found",
                    "reason": "not_found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(constraint)) => {
                // Known constraints are mapped to domain conflicts in the
                // services; anything reaching here is reported generically.
                json!({
                    "error": format!("Conflicting write ({constraint})"),
                    "reason": "conflict"
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred",
                    "reason": "internal_error"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "reason": "validation_failed",
                    "details": field_errors
                })
            }
            Self::BadRequest { reason, message } => {
                json!({
                    "error": message,
                    "reason": reason
                })
            }
            Self::Forbidden { reason, message } => {
                json!({
                    "error": message,
                    "reason": reason
                })
            }
            Self::NotFound { reason } => {
                json!({
                    "error": "Resource not found",
                    "reason": reason
                })
            }
            Self::Conflict { reason, message } => {
                json!({
                    "error": message,
                    "reason": reason
                })
            }
            Self::Gateway(e) => {
                tracing::error!("Payment gateway failure: {}", e);
                json!({
                    "error": "Payment provider is unavailable, retry later",
                    "reason": "payment_gateway_unavailable"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<GatewayError> for WebError {
    fn from(error: GatewayError) -> Self {
        Self::Gateway(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_failures_map_to_client_statuses() {
        assert_eq!(
            WebError::not_found("event_not_found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::conflict("already_joined", "already joined").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            WebError::bad_request("team_full", "max team size 5 reached").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::forbidden("not_team_member", "only team member can register").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_not_found_maps_to_404() {
        assert_eq!(
            WebError::from(StorageError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn gateway_failures_are_retriable_5xx() {
        let err = WebError::from(GatewayError::NotConfigured("razorpay"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
