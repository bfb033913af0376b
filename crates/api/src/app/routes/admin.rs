//! Admin routes for profile management.
//!
//! Mounted behind the `admin` role guard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get},
};
use serde_json::json;

use crewdash_core::{ApiError, UserId};

use crate::app::dto::{CreateProfileRequest, ProfileEntry};
use crate::app::errors::HandlerResult;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route("/profiles/:id", delete(delete_profile))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /admin/profiles
pub async fn list_profiles(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<ProfileEntry>> {
    let entries = services
        .profiles
        .list()
        .await
        .into_iter()
        .map(|(user_id, profile)| ProfileEntry { user_id, profile })
        .collect();
    Json(entries)
}

/// POST /admin/profiles
pub async fn create_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<ProfileEntry>)> {
    let Json(body) = payload?;
    let profile = body.profile.validate()?;

    services.profiles.create(body.user_id, profile.clone()).await?;
    tracing::info!(admin = %principal.user_id(), user_id = %body.user_id, "profile created");

    Ok((
        StatusCode::CREATED,
        Json(ProfileEntry {
            user_id: body.user_id,
            profile,
        }),
    ))
}

/// DELETE /admin/profiles/:id
pub async fn delete_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> HandlerResult<StatusCode> {
    let user_id: UserId = id
        .parse()
        .map_err(|e: crewdash_core::InvalidId| ApiError::validation(Some(json!({ "reason": e.to_string() }))))?;

    services.profiles.remove(user_id).await?;
    tracing::info!(admin = %principal.user_id(), %user_id, "profile deleted");

    Ok(StatusCode::NO_CONTENT)
}
