//! `crewdash-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Session
//! issuance and verification are delegated to an [`IdentityProvider`].

pub mod authorize;
pub mod guard;
pub mod identity;
pub mod provider;
pub mod roles;
pub mod session;

pub use authorize::{AuthzError, authorize_roles};
pub use guard::{Access, AuthState, check_access};
pub use identity::Identity;
pub use provider::{Credentials, IdentityProvider, InMemoryIdentityProvider, ProviderError};
pub use roles::{Role, RoleSet};
pub use session::{Session, SessionValidationError, validate_session};
