//! Request pipeline layers wrapped around every route.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
        header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::Next,
    response::Response,
};

use crewdash_auth::IdentityProvider;
use crewdash_core::ApiError;

use crate::app::errors::{Failure, HandledFailure, render};
use crate::config::AppConfig;
use crate::context::{PrincipalContext, RequestReference};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AuthGate {
    pub provider: Arc<dyn IdentityProvider>,
}

/// Resolve the bearer token into a [`PrincipalContext`].
///
/// Missing or malformed credentials are a 401; errors reported by the
/// identity provider (invalid/expired token) pass through as provider errors.
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, Failure> {
    let token = extract_bearer(req.headers())?.to_owned();

    let session = gate.provider.verify(&token).await?;

    req.extensions_mut().insert(PrincipalContext::from_session(session));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(ApiError::unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::unauthorized())?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or_else(ApiError::unauthorized)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized());
    }

    Ok(token)
}

/// Outermost layer: tags the request with a reference, then logs and renders
/// any failure raised further in.
///
/// Outside production the failure's debug chain (including a captured
/// backtrace, when enabled) is logged as well. It never reaches the client.
pub async fn error_middleware(
    State(config): State<Arc<AppConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let reference = RequestReference::new();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    req.extensions_mut().insert(reference.clone());

    let mut response = next.run(req).await;

    // Axum answers a known path with the wrong method itself, without a body.
    let failure = match response.extensions_mut().remove::<HandledFailure>() {
        Some(HandledFailure(failure)) => Some(failure),
        None if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
            Some(Arc::new(Failure::Api(ApiError::not_found(Some("Route")))))
        }
        None => None,
    };

    if let Some(failure) = failure {
        let rendered = render(&failure, Some(reference.as_str()));
        log_failure(&config, &method, &path, &reference, rendered.status(), &failure);

        // Keep headers set further in (security headers etc.), but not the body framing.
        let original = std::mem::take(response.headers_mut());
        response = rendered;
        for (name, value) in original.iter() {
            let framing = name == CONTENT_TYPE || name == CONTENT_LENGTH || name == ALLOW;
            if !framing && !response.headers().contains_key(name) {
                response.headers_mut().insert(name.clone(), value.clone());
            }
        }
    }

    if let Ok(value) = HeaderValue::from_str(reference.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Log a failed request. The debug chain is recorded only outside production.
fn log_failure(
    config: &AppConfig,
    method: &Method,
    path: &str,
    reference: &RequestReference,
    status: StatusCode,
    failure: &Failure,
) {
    let stack = (!config.environment.is_production()).then(|| format!("{failure:?}"));

    if status.is_server_error() {
        tracing::error!(
            %method,
            path,
            status = status.as_u16(),
            reference = reference.as_str(),
            stack = stack.as_deref(),
            "request failed: {failure}"
        );
    } else {
        tracing::warn!(
            %method,
            path,
            status = status.as_u16(),
            reference = reference.as_str(),
            stack = stack.as_deref(),
            "request failed: {failure}"
        );
    }
}

/// Apply the environment's security headers to every response.
pub async fn security_headers(
    State(config): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    for (name, value) in config.security_headers() {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    response
}

/// Fallback for unknown API paths.
pub async fn not_found() -> Failure {
    Failure::Api(ApiError::not_found(Some("Route")))
}
