//! Application error taxonomy.
//!
//! `ApiError` is transport-agnostic: it carries a [`ErrorKind`] that maps to a
//! fixed HTTP-style status code, a client-facing message and optional
//! structured details. The HTTP layer renders it; nothing here knows about
//! a web framework.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type used by request-handling code.
pub type ApiResult<T> = Result<T, ApiError>;

/// Fixed set of classified failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServerError,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::ServerError => 500,
        }
    }
}

/// A classified application error.
///
/// Constructed once per failure and never mutated afterwards; the builder
/// methods consume `self`.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// 400 "Validation error", optionally with structured details.
    pub fn validation(details: Option<Value>) -> Self {
        Self {
            details,
            ..Self::new(ErrorKind::Validation, "Validation error")
        }
    }

    /// 401 "Unauthorized access".
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, "Unauthorized access")
    }

    /// 403 "Insufficient permissions".
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden, "Insufficient permissions")
    }

    /// 404 "`{resource}` not found" (resource defaults to "Resource").
    pub fn not_found(resource: Option<&str>) -> Self {
        let resource = resource.unwrap_or("Resource");
        Self::new(ErrorKind::NotFound, format!("{resource} not found"))
    }

    /// 409 with the caller's message, or "Resource conflict".
    pub fn conflict(message: Option<&str>) -> Self {
        Self::new(ErrorKind::Conflict, message.unwrap_or("Resource conflict"))
    }

    /// 500 "Internal server error", optionally with structured details.
    pub fn server_error(details: Option<Value>) -> Self {
        Self {
            details,
            ..Self::new(ErrorKind::ServerError, "Internal server error")
        }
    }

    /// Replace the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_follow_the_taxonomy() {
        let cases = [
            (ApiError::validation(None), 400, "Validation error"),
            (ApiError::unauthorized(), 401, "Unauthorized access"),
            (ApiError::forbidden(), 403, "Insufficient permissions"),
            (ApiError::not_found(None), 404, "Resource not found"),
            (ApiError::conflict(None), 409, "Resource conflict"),
            (ApiError::server_error(None), 500, "Internal server error"),
        ];

        for (err, status, message) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.message(), message);
            assert!(err.details().is_none());
        }
    }

    #[test]
    fn not_found_interpolates_resource() {
        let err = ApiError::not_found(Some("Project"));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn conflict_uses_caller_message() {
        let err = ApiError::conflict(Some("Email already registered"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "Email already registered");
    }

    #[test]
    fn validation_and_server_error_carry_details() {
        let details = json!({ "field": "full_name" });
        let err = ApiError::validation(Some(details.clone()));
        assert_eq!(err.details(), Some(&details));

        let err = ApiError::server_error(None).with_details(json!("db down"));
        assert_eq!(err.details(), Some(&json!("db down")));
        assert_eq!(err.message(), "Internal server error");
    }
}
