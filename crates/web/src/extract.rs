use async_trait::async_trait;
use axum::Json;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::Request;

use crate::error::WebError;

/// `Json` wrapper that reports body problems (missing fields, malformed
/// JSON) as a 400 with the service's error shape instead of axum's
/// default rejection.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(WebError::bad_request("invalid_body", rejection.body_text())),
        }
    }
}
