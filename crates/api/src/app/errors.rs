//! Failure classification and the JSON error envelope.
//!
//! Every handler and middleware failure is a [`Failure`]. Rendering follows a
//! fixed priority chain:
//!
//! 1. taxonomy errors ([`ApiError`]) keep their own status and details;
//! 2. errors reported by the identity provider become 400 with the
//!    provider's code;
//! 3. anything else is a 500 with a generic message and the request
//!    reference, never the internal detail.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;

use crewdash_auth::{AuthzError, ProviderError};
use crewdash_core::ApiError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, Failure>;

const GENERIC_MESSAGE: &str = "Internal server error";

/// A failure raised while handling a request.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Only errors the provider itself reported; transport failures are
    /// unclassified.
    #[error("identity provider: {0}")]
    Provider(ProviderError),

    #[error("unclassified: {0:#}")]
    Unclassified(anyhow::Error),
}

impl From<ProviderError> for Failure {
    fn from(err: ProviderError) -> Self {
        if err.is_reported() {
            Failure::Provider(err)
        } else {
            Failure::Unclassified(anyhow::Error::new(err))
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Unclassified(err)
    }
}

impl From<JsonRejection> for Failure {
    fn from(rejection: JsonRejection) -> Self {
        Failure::Api(ApiError::validation(Some(json!({ "reason": rejection.body_text() }))))
    }
}

impl From<AuthzError> for Failure {
    fn from(_: AuthzError) -> Self {
        Failure::Api(ApiError::forbidden())
    }
}

/// Compute the status and JSON envelope for a failure.
pub fn classify(failure: &Failure, reference: Option<&str>) -> (StatusCode, Value) {
    match failure {
        Failure::Api(err) => (
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            json!({
                "error": {
                    "message": err.message(),
                    "details": err.details(),
                }
            }),
        ),
        Failure::Provider(err) => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": {
                    "message": err.to_string(),
                    "code": err.code(),
                }
            }),
        ),
        Failure::Unclassified(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": {
                    "message": GENERIC_MESSAGE,
                    "reference": reference,
                }
            }),
        ),
    }
}

/// Marker left on a response so the error middleware can log and re-render it.
#[derive(Debug, Clone)]
pub struct HandledFailure(pub Arc<Failure>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        // Rendered without a reference; the error middleware re-renders with one.
        let (status, body) = classify(&self, None);
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(HandledFailure(Arc::new(self)));
        response
    }
}

pub fn render(failure: &Failure, reference: Option<&str>) -> Response {
    let (status, body) = classify(failure, reference);
    (status, Json(body)).into_response()
}
