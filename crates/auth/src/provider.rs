//! Identity-provider seam.
//!
//! Session issuance and verification belong to an external identity
//! provider. This module defines the contract, the classification of the
//! provider's error bodies, and an in-memory provider for development and
//! tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crewdash_core::UserId;

use crate::{Identity, Role, RoleSet, Session, validate_session};

/// Login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error reported by the identity provider, classified at the boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// OAuth-style body: `{"error": "...", "error_description": "..."}`.
    #[error("{description}")]
    Described { description: String, code: Option<Value> },

    /// Message-style body: `{"code": ..., "msg": "..."}`.
    #[error("{message}")]
    Message { message: String, code: Option<Value> },

    /// The provider could not be reached or answered with an unknown shape.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProviderError {
    Described {
        error_description: String,
        #[serde(default)]
        error: Option<Value>,
        #[serde(default)]
        code: Option<Value>,
    },
    Message {
        msg: String,
        #[serde(default)]
        code: Option<Value>,
    },
}

impl ProviderError {
    /// Classify a raw provider error body.
    ///
    /// `error_description` takes precedence over `msg`. Returns `None` when
    /// the body has neither shape.
    pub fn decode(body: &Value) -> Option<Self> {
        let raw = RawProviderError::deserialize(body).ok()?;
        Some(match raw {
            RawProviderError::Described {
                error_description,
                error,
                code,
            } => ProviderError::Described {
                description: error_description,
                code: error.or(code),
            },
            RawProviderError::Message { msg, code } => ProviderError::Message { message: msg, code },
        })
    }

    /// Decode a raw body, falling back to [`ProviderError::Unavailable`].
    pub fn from_body(body: &Value) -> Self {
        Self::decode(body).unwrap_or_else(|| ProviderError::Unavailable(body.to_string()))
    }

    /// True for errors the provider itself reported (as opposed to transport failures).
    pub fn is_reported(&self) -> bool {
        !matches!(self, ProviderError::Unavailable(_))
    }

    pub fn code(&self) -> Option<&Value> {
        match self {
            ProviderError::Described { code, .. } | ProviderError::Message { code, .. } => code.as_ref(),
            ProviderError::Unavailable(_) => None,
        }
    }

    fn described(description: &str, code: &str) -> Self {
        ProviderError::Described {
            description: description.to_string(),
            code: Some(Value::String(code.to_string())),
        }
    }
}

/// External identity provider contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ProviderError>;

    /// Resolve an access token to its live session.
    async fn verify(&self, access_token: &str) -> Result<Session, ProviderError>;

    /// Revoke an access token. Revoking an unknown token is not an error.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    identity: Identity,
}

/// In-memory identity provider (dev/test).
///
/// Passwords are compared in plain text and tokens are not signed; this is
/// a stand-in for the hosted provider, never a production backend.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
    session_ttl: Duration,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::with_session_ttl(Duration::hours(1))
    }

    pub fn with_session_ttl(session_ttl: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
        }
    }

    /// Provider pre-loaded with an admin and a worker account.
    pub async fn with_dev_accounts() -> Self {
        let provider = Self::new();
        provider
            .register(
                "admin@crewdash.dev",
                "admin-password",
                RoleSet::single(Role::ADMIN),
                Some(("Dana Admin", "supervisor")),
            )
            .await;
        provider
            .register(
                "worker@crewdash.dev",
                "worker-password",
                RoleSet::single(Role::new("worker")),
                Some(("Wes Worker", "electrician")),
            )
            .await;
        provider
    }

    /// Register (or replace) an account and return its identity.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        roles: RoleSet,
        profile: Option<(&str, &str)>,
    ) -> Identity {
        let mut identity = Identity::new(UserId::new(), email, roles);
        if let Some((full_name, worker_type)) = profile {
            identity = identity.with_profile(full_name, worker_type);
        }

        self.accounts.write().await.insert(
            normalize_email(email),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        identity
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ProviderError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ProviderError::Message {
                message: "Email and password are required".to_string(),
                code: Some(Value::from(422)),
            });
        }

        let account = self
            .accounts
            .read()
            .await
            .get(&normalize_email(&credentials.email))
            .cloned()
            .filter(|a| a.password == credentials.password)
            .ok_or_else(|| ProviderError::described("Invalid login credentials", "invalid_grant"))?;

        let now = Utc::now();
        let session = Session {
            access_token: format!("dev-{}", Uuid::now_v7().simple()),
            identity: account.identity,
            issued_at: now,
            expires_at: now + self.session_ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        if sessions.len() < before {
            tracing::debug!(purged = before - sessions.len(), "dropped expired sessions");
        }
        sessions.insert(session.access_token.clone(), session.clone());
        drop(sessions);

        tracing::debug!(user_id = %session.identity.user_id, "issued session");
        Ok(session)
    }

    async fn verify(&self, access_token: &str) -> Result<Session, ProviderError> {
        let session = self
            .sessions
            .read()
            .await
            .get(access_token)
            .cloned()
            .ok_or_else(|| ProviderError::described("Invalid token", "invalid_token"))?;

        if let Err(e) = validate_session(&session, Utc::now()) {
            tracing::debug!(user_id = %session.identity.user_id, "rejecting session: {e}");
            self.sessions.write().await.remove(access_token);
            return Err(ProviderError::described("Token has expired", "token_expired"));
        }

        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.sessions.write().await.remove(access_token);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
