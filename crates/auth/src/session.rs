use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Identity;

/// An authenticated session issued by the identity provider.
///
/// The access token is opaque at this layer; signature verification happens
/// inside the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a session's time window.
pub fn validate_session(session: &Session, now: DateTime<Utc>) -> Result<(), SessionValidationError> {
    if session.expires_at <= session.issued_at {
        return Err(SessionValidationError::InvalidTimeWindow);
    }
    if now < session.issued_at {
        return Err(SessionValidationError::NotYetValid);
    }
    if now >= session.expires_at {
        return Err(SessionValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crewdash_core::UserId;

    use crate::RoleSet;

    fn session(issued_at: DateTime<Utc>, ttl: Duration) -> Session {
        Session {
            access_token: "t".to_string(),
            identity: Identity::new(UserId::new(), "a@example.com", RoleSet::empty()),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_session(&session(now, Duration::minutes(5)), now), Ok(()));
    }

    #[test]
    fn rejects_expired() {
        let now = Utc::now();
        let s = session(now - Duration::minutes(10), Duration::minutes(5));
        assert_eq!(validate_session(&s, now), Err(SessionValidationError::Expired));
    }

    #[test]
    fn rejects_future_and_inverted_windows() {
        let now = Utc::now();
        let s = session(now + Duration::minutes(1), Duration::minutes(5));
        assert_eq!(validate_session(&s, now), Err(SessionValidationError::NotYetValid));

        let s = session(now, Duration::zero());
        assert_eq!(validate_session(&s, now), Err(SessionValidationError::InvalidTimeWindow));
    }
}
