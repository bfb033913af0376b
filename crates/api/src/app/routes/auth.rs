//! Session routes; issuance and revocation are delegated to the identity provider.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};

use crewdash_auth::Credentials;

use crate::app::dto::SessionResponse;
use crate::app::errors::HandlerResult;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// POST /auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> HandlerResult<Json<SessionResponse>> {
    let Json(credentials) = payload?;

    let session = services.provider.sign_in(&credentials).await?;
    tracing::info!(user_id = %session.identity.user_id, "signed in");

    Ok(Json(SessionResponse::from(session)))
}

/// POST /auth/logout
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> HandlerResult<StatusCode> {
    services.provider.sign_out(principal.access_token()).await?;
    tracing::info!(user_id = %principal.user_id(), "signed out");

    Ok(StatusCode::NO_CONTENT)
}
