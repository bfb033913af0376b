//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: identity provider + profile store shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: failure classification and the error envelope

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crewdash_auth::{IdentityProvider, Role, RoleSet};

use crate::config::AppConfig;
use crate::{authz, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(config: AppConfig, provider: Arc<dyn IdentityProvider>) -> Router {
    let config = Arc::new(config);
    let auth_gate = middleware::AuthGate {
        provider: provider.clone(),
    };
    let services = Arc::new(services::AppServices::new(provider));

    // Admin routes: role check runs after authentication.
    let admin = routes::admin::router().route_layer(axum::middleware::from_fn_with_state(
        RoleSet::single(Role::ADMIN),
        authz::require_roles,
    ));

    // Protected routes: require a verified bearer token.
    let protected = routes::authenticated_router()
        .nest("/admin", admin)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_gate,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .fallback(middleware::not_found)
        .layer(
            // Outermost first: the error layer sees everything, including
            // failures raised by the auth and role layers.
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    config.clone(),
                    middleware::error_middleware,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    config,
                    middleware::security_headers,
                ))
                .layer(Extension(services)),
        )
}
