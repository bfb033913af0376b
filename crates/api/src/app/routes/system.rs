use axum::{Json, extract::Extension, http::StatusCode};

use crate::app::dto::IdentityResponse;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /me
pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(principal.identity()))
}
