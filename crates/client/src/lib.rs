//! `crewdash-client`
//!
//! **Responsibility:** client-side session handling.
//!
//! This crate provides:
//! - The auth context (session restore, login, logout)
//! - Route resolution behind the role gate
//! - Local persistence of the user's display profile
//!
//! Rendering is left to the embedding shell; the provider stays the
//! authority for sessions.

pub mod context;
pub mod routes;
pub mod store;
pub mod user_data;
pub mod view_model;

pub use context::{AuthContext, SESSION_TOKEN_KEY};
pub use routes::{Navigation, Navigator, Resolution, Route, resolve_route};
pub use store::{InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore};
pub use user_data::{DecodeError, USER_DATA_KEY, UserDataStore};
pub use view_model::{ProfileViewModel, title_case};
