//! `crewdash-core`: shared building blocks.
//!
//! This crate contains **pure** types used by both the backend and the
//! client (no HTTP, no storage).

pub mod error;
pub mod id;
pub mod profile;

pub use error::{ApiError, ApiResult, ErrorKind};
pub use id::{InvalidId, UserId};
pub use profile::UserData;
