//! Protected-route gate.
//!
//! The gate is a pure decision over the current [`AuthState`] and a role
//! requirement. Rendering and navigation live with the caller.

use crate::{Identity, RoleSet, Session, authorize_roles};

/// Authentication state of the running client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Session restoration has not resolved yet.
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session().map(|s| &s.identity)
    }

    pub fn roles(&self) -> Option<&RoleSet> {
        self.identity().map(|i| &i.roles)
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// State is still loading; decide again once it resolves.
    Pending,
    Granted,
    RedirectToLogin,
    RedirectToUnauthorized,
}

/// Decide whether content guarded by `required` may render.
///
/// Grants iff authenticated and (`required` is empty or the identity holds
/// one of the required roles).
pub fn check_access(state: &AuthState, required: &RoleSet) -> Access {
    match state {
        AuthState::Loading => Access::Pending,
        AuthState::SignedOut => Access::RedirectToLogin,
        AuthState::SignedIn(session) => match authorize_roles(&session.identity.roles, required) {
            Ok(()) => Access::Granted,
            Err(_) => Access::RedirectToUnauthorized,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crewdash_core::UserId;
    use proptest::prelude::*;

    use crate::Role;

    fn signed_in(roles: RoleSet) -> AuthState {
        let now = Utc::now();
        AuthState::SignedIn(Session {
            access_token: "token".to_string(),
            identity: Identity::new(UserId::new(), "kim@example.com", roles),
            issued_at: now,
            expires_at: now + Duration::hours(1),
        })
    }

    #[test]
    fn loading_never_redirects() {
        assert_eq!(check_access(&AuthState::Loading, &RoleSet::empty()), Access::Pending);
        assert_eq!(
            check_access(&AuthState::Loading, &RoleSet::single(Role::ADMIN)),
            Access::Pending
        );
    }

    #[test]
    fn signed_out_goes_to_login() {
        assert_eq!(
            check_access(&AuthState::SignedOut, &RoleSet::single(Role::ADMIN)),
            Access::RedirectToLogin
        );
    }

    #[test]
    fn worker_on_admin_route_is_unauthorized() {
        let state = signed_in(RoleSet::single(Role::new("worker")));
        assert_eq!(
            check_access(&state, &RoleSet::single(Role::ADMIN)),
            Access::RedirectToUnauthorized
        );
        assert_eq!(check_access(&state, &RoleSet::empty()), Access::Granted);
    }

    #[test]
    fn accessors_reflect_state() {
        let state = signed_in(RoleSet::single(Role::ADMIN));
        assert!(state.is_authenticated());
        assert_eq!(state.identity().unwrap().email, "kim@example.com");
        assert!(state.roles().unwrap().contains(&Role::ADMIN));
        assert!(AuthState::SignedOut.identity().is_none());
    }

    fn role_set() -> impl Strategy<Value = RoleSet> {
        prop::collection::btree_set("[a-d]", 0..4)
            .prop_map(|names| names.into_iter().map(Role::new).collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: granted iff authenticated and (required empty or role in required).
        #[test]
        fn grants_iff_authenticated_and_member(
            required in role_set(),
            held in "[a-e]",
            authenticated in any::<bool>(),
        ) {
            let held_role = Role::new(held);
            let state = if authenticated {
                signed_in(RoleSet::single(held_role.clone()))
            } else {
                AuthState::SignedOut
            };

            let expected = authenticated && (required.is_empty() || required.contains(&held_role));
            prop_assert_eq!(check_access(&state, &required) == Access::Granted, expected);
        }
    }
}
