//! API-side role guard.
//!
//! Runs after [`auth_middleware`](crate::middleware::auth_middleware) and
//! applies the same role rule as the client route gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crewdash_auth::{RoleSet, authorize_roles};
use crewdash_core::ApiError;

use crate::app::errors::Failure;
use crate::context::PrincipalContext;

/// Require the principal to hold one of `required`.
///
/// No principal is a 401; a principal without a matching role is a 403.
pub async fn require_roles(
    State(required): State<RoleSet>,
    req: Request,
    next: Next,
) -> Result<Response, Failure> {
    let principal = req
        .extensions()
        .get::<PrincipalContext>()
        .ok_or_else(ApiError::unauthorized)?;

    if let Err(e) = authorize_roles(principal.roles(), &required) {
        tracing::info!(user_id = %principal.user_id(), roles = %principal.roles(), "{e}");
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
