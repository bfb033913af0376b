use thiserror::Error;

use crate::RoleSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires one of {required}")]
    MissingRole { required: RoleSet },
}

/// Check that `held` satisfies a role requirement.
///
/// - An empty `required` set admits anyone.
/// - Otherwise at least one held role must be in `required` (exact match,
///   no role hierarchy).
///
/// No IO, no panics. Shared by the client route gate and the API role layer.
pub fn authorize_roles(held: &RoleSet, required: &RoleSet) -> Result<(), AuthzError> {
    if required.is_empty() || held.intersects(required) {
        Ok(())
    } else {
        Err(AuthzError::MissingRole {
            required: required.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn empty_requirement_admits_anyone() {
        assert_eq!(authorize_roles(&RoleSet::empty(), &RoleSet::empty()), Ok(()));
    }

    #[test]
    fn exact_membership_only() {
        let held = RoleSet::single(Role::new("manager"));
        let required = RoleSet::single(Role::ADMIN);

        let err = authorize_roles(&held, &required).unwrap_err();
        assert_eq!(err.to_string(), "forbidden: requires one of [admin]");

        let held: RoleSet = [Role::new("manager"), Role::ADMIN].into_iter().collect();
        assert_eq!(authorize_roles(&held, &required), Ok(()));
    }

    #[test]
    fn role_names_are_case_sensitive() {
        let held = RoleSet::single(Role::new("Admin"));
        assert!(authorize_roles(&held, &RoleSet::single(Role::ADMIN)).is_err());
    }
}
