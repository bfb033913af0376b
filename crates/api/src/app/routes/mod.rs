use axum::{
    Router,
    routing::{get, post},
};

pub mod admin;
pub mod auth;
pub mod profile;
pub mod system;

/// Routes that need no credentials.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
}

/// Routes for any authenticated user.
pub fn authenticated_router() -> Router {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/me", get(system::whoami))
        .route("/me/profile", get(profile::get_profile).put(profile::put_profile))
}
