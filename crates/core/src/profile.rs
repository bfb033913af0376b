//! User display profile.

use serde::{Deserialize, Deserializer, Serialize};

/// Display profile of the authenticated user.
///
/// # Invariants
/// - `full_name` and `worker_type` are never empty (or whitespace-only)
///   strings. A blank value is stored as `None`, both at construction and
///   when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, deserialize_with = "blank_as_none")]
    full_name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    worker_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    email: Option<String>,
}

impl UserData {
    pub fn new(full_name: impl Into<String>, worker_type: impl Into<String>) -> Self {
        Self {
            full_name: non_blank(full_name.into()),
            worker_type: non_blank(worker_type.into()),
            email: None,
        }
    }

    /// Build from optional parts, normalizing blanks to `None`.
    pub fn from_parts(full_name: Option<String>, worker_type: Option<String>) -> Self {
        Self {
            full_name: full_name.and_then(non_blank),
            worker_type: worker_type.and_then(non_blank),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email.into());
        self
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn worker_type(&self) -> Option<&str> {
        self.worker_type.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// True when both display fields are present.
    pub fn is_complete(&self) -> bool {
        self.full_name.is_some() && self.worker_type.is_some()
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.worker_type.is_none() && self.email.is_none()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(non_blank))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_absent() {
        let data = UserData::new("  ", "");
        assert_eq!(data.full_name(), None);
        assert_eq!(data.worker_type(), None);
        assert!(!data.is_complete());
    }

    #[test]
    fn empty_only_without_any_field() {
        assert!(UserData::new("  ", "").is_empty());
        assert!(!UserData::new("", "").with_email("a@example.com").is_empty());
        assert!(!UserData::from_parts(None, Some("welder".to_string())).is_empty());
    }

    #[test]
    fn decoding_normalizes_blanks() {
        let data: UserData =
            serde_json::from_str(r#"{"full_name":"","worker_type":"electrician"}"#).unwrap();
        assert_eq!(data.full_name(), None);
        assert_eq!(data.worker_type(), Some("electrician"));
    }

    #[test]
    fn missing_fields_decode_as_absent() {
        let data: UserData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, UserData::default());
    }

    #[test]
    fn email_is_omitted_when_absent() {
        let json = serde_json::to_value(UserData::new("Ada Byron", "admin")).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["full_name"], "Ada Byron");
    }
}
