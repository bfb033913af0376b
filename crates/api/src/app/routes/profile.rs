use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};

use crewdash_core::{ApiError, UserData};

use crate::app::dto::ProfileInput;
use crate::app::errors::HandlerResult;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// GET /me/profile
///
/// Falls back to the provider's profile metadata when nothing was stored yet.
pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> HandlerResult<Json<UserData>> {
    let profile = match services.profiles.get(principal.user_id()).await {
        Some(profile) => Some(profile),
        None => principal.identity().profile(),
    };

    profile
        .map(Json)
        .ok_or_else(|| ApiError::not_found(Some("Profile")).into())
}

/// PUT /me/profile
pub async fn put_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<ProfileInput>, JsonRejection>,
) -> HandlerResult<Json<UserData>> {
    let Json(input) = payload?;
    let profile = input.validate()?;

    services.profiles.upsert(principal.user_id(), profile.clone()).await;

    Ok(Json(profile))
}
