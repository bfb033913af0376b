use uuid::Uuid;

use crewdash_auth::{Identity, RoleSet, Session};
use crewdash_core::UserId;

/// Per-request correlation reference.
///
/// Attached to every request by the error middleware, echoed in the
/// `x-request-id` header and in fallback error bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReference(String);

impl RequestReference {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestReference {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RequestReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Principal context for a request (verified identity + roles).
///
/// Inserted by the auth middleware; immutable for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
    access_token: String,
}

impl PrincipalContext {
    pub fn from_session(session: Session) -> Self {
        Self {
            identity: session.identity,
            access_token: session.access_token,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn roles(&self) -> &RoleSet {
        &self.identity.roles
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}
