use serde::{Deserialize, Serialize};

use crewdash_core::{UserData, UserId};

use crate::{Role, RoleSet};

/// Identity of an authenticated user, as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub roles: RoleSet,

    /// Profile fields the provider keeps as user metadata.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
}

impl Identity {
    pub fn new(user_id: UserId, email: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            user_id,
            email: email.into(),
            roles,
            full_name: None,
            worker_type: None,
        }
    }

    pub fn with_profile(mut self, full_name: impl Into<String>, worker_type: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self.worker_type = Some(worker_type.into());
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Display profile derived from the provider metadata.
    ///
    /// Returns `None` unless both display fields are present and non-blank.
    pub fn profile(&self) -> Option<UserData> {
        let data = UserData::from_parts(self.full_name.clone(), self.worker_type.clone())
            .with_email(self.email.clone());
        data.is_complete().then_some(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_requires_both_fields() {
        let identity = Identity::new(UserId::new(), "sam@example.com", RoleSet::empty());
        assert!(identity.profile().is_none());

        let identity = identity.with_profile("Sam Reyes", "welder");
        let profile = identity.profile().unwrap();
        assert_eq!(profile.full_name(), Some("Sam Reyes"));
        assert_eq!(profile.worker_type(), Some("welder"));
        assert_eq!(profile.email(), Some("sam@example.com"));
    }

    #[test]
    fn blank_metadata_is_not_a_profile() {
        let identity =
            Identity::new(UserId::new(), "sam@example.com", RoleSet::empty()).with_profile("", "welder");
        assert!(identity.profile().is_none());
    }
}
