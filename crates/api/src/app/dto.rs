//! Request/response DTOs and JSON mapping helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crewdash_auth::{Identity, RoleSet, Session};
use crewdash_core::{ApiError, UserData, UserId};

#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    pub user_id: UserId,
    pub email: String,
    pub roles: RoleSet,
    pub full_name: Option<String>,
    pub worker_type: Option<String>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            full_name: identity.full_name.clone(),
            worker_type: identity.worker_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: IdentityResponse,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: IdentityResponse::from(&session.identity),
            access_token: session.access_token,
            expires_at: session.expires_at,
        }
    }
}

/// Profile fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileInput {
    /// Validate into a complete profile.
    ///
    /// Both display fields are required and must not be blank; the error
    /// lists every offending field.
    pub fn validate(self) -> Result<UserData, ApiError> {
        let mut fields = Vec::new();
        if is_blank(&self.full_name) {
            fields.push(json!({ "field": "full_name", "message": "must not be blank" }));
        }
        if is_blank(&self.worker_type) {
            fields.push(json!({ "field": "worker_type", "message": "must not be blank" }));
        }
        if !fields.is_empty() {
            return Err(ApiError::validation(Some(json!({ "fields": fields }))));
        }

        let profile = UserData::from_parts(self.full_name, self.worker_type);
        Ok(match self.email {
            Some(email) => profile.with_email(email),
            None => profile,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub user_id: UserId,
    #[serde(flatten)]
    pub profile: ProfileInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileEntry {
    pub user_id: UserId,
    pub profile: UserData,
}
