//! Client-side auth context.
//!
//! [`AuthContext`] owns the session for the running client. State changes are
//! published as whole [`AuthState`] snapshots over a `watch` channel, so a
//! reader sees either the old identity and roles or the new ones, never a
//! mix.

use std::sync::Arc;

use tokio::sync::watch;

use crewdash_auth::{AuthState, Credentials, Identity, IdentityProvider, ProviderError};

use crate::store::KeyValueStore;
use crate::user_data::UserDataStore;

/// Slot holding the access token of the persisted session.
pub const SESSION_TOKEN_KEY: &str = "session_token";

pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn KeyValueStore>,
    user_data: UserDataStore,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    /// New context in [`AuthState::Loading`]. Call [`AuthContext::restore`]
    /// to resolve it.
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            user_data: UserDataStore::new(store.clone()),
            store,
            state: watch::Sender::new(AuthState::Loading),
        }
    }

    /// Resolve the initial state from the persisted token.
    ///
    /// Only applies while still loading: a login that completed first wins.
    pub async fn restore(&self) -> AuthState {
        let token = match self.store.get(SESSION_TOKEN_KEY).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session token");
                None
            }
        };

        let next = match token {
            None => AuthState::SignedOut,
            Some(token) => match self.provider.verify(&token).await {
                Ok(session) => {
                    tracing::info!(user_id = %session.identity.user_id, "restored session");
                    AuthState::SignedIn(session)
                }
                Err(err) => {
                    tracing::info!(error = %err, "persisted session rejected");
                    self.forget_stale_token(&token).await;
                    AuthState::SignedOut
                }
            },
        };

        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = next;
                true
            } else {
                false
            }
        });
        self.state()
    }

    pub async fn login(&self, credentials: Credentials) -> Result<Identity, ProviderError> {
        let session = match self.provider.sign_in(&credentials).await {
            Ok(session) => session,
            Err(err) => {
                tracing::info!(error = %err, "sign-in rejected");
                self.state.send_if_modified(|state| {
                    if state.is_loading() {
                        *state = AuthState::SignedOut;
                        true
                    } else {
                        false
                    }
                });
                return Err(err);
            }
        };

        if let Err(err) = self.store.put(SESSION_TOKEN_KEY, &session.access_token).await {
            tracing::warn!(error = %err, "failed to persist session token");
        }
        if let Some(profile) = session.identity.profile() {
            self.user_data.save(&profile).await;
        }

        let identity = session.identity.clone();
        tracing::info!(user_id = %identity.user_id, "signed in");
        self.state.send_replace(AuthState::SignedIn(session));
        Ok(identity)
    }

    /// Sign out. Safe to call when already signed out.
    pub async fn logout(&self) {
        let previous = self.state.send_replace(AuthState::SignedOut);

        if let Some(session) = previous.session() {
            if let Err(err) = self.provider.sign_out(&session.access_token).await {
                tracing::warn!(error = %err, "provider sign-out failed");
            }
            tracing::info!(user_id = %session.identity.user_id, "signed out");
        }

        self.forget_token().await;
        self.user_data.clear().await;
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Wait until the state leaves [`AuthState::Loading`].
    pub async fn resolved(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub fn user_data(&self) -> &UserDataStore {
        &self.user_data
    }

    /// Remove `stale` unless the slot was overwritten in the meantime.
    async fn forget_stale_token(&self, stale: &str) {
        match self.store.get(SESSION_TOKEN_KEY).await {
            Ok(Some(current)) if current == stale => self.forget_token().await,
            Ok(_) => tracing::debug!("session token replaced during restore, keeping it"),
            Err(err) => tracing::warn!(error = %err, "failed to re-read session token"),
        }
    }

    async fn forget_token(&self) {
        if let Err(err) = self.store.remove(SESSION_TOKEN_KEY).await {
            tracing::warn!(error = %err, "failed to remove session token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdash_auth::{InMemoryIdentityProvider, Role, RoleSet};

    use crate::store::InMemoryKeyValueStore;

    async fn provider() -> Arc<InMemoryIdentityProvider> {
        let provider = InMemoryIdentityProvider::new();
        provider
            .register(
                "ana@example.com",
                "secret",
                RoleSet::single(Role::ADMIN),
                Some(("Ana Ruiz", "supervisor")),
            )
            .await;
        provider
            .register("bo@example.com", "secret", RoleSet::single(Role::new("worker")), None)
            .await;
        Arc::new(provider)
    }

    fn context(provider: Arc<InMemoryIdentityProvider>, store: Arc<InMemoryKeyValueStore>) -> AuthContext {
        AuthContext::new(provider, store)
    }

    #[tokio::test]
    async fn starts_loading_and_restores_signed_out_without_token() {
        let ctx = context(provider().await, Arc::new(InMemoryKeyValueStore::new()));
        assert!(ctx.state().is_loading());

        assert_eq!(ctx.restore().await, AuthState::SignedOut);
        assert_eq!(ctx.resolved().await, AuthState::SignedOut);
    }

    #[tokio::test]
    async fn login_publishes_session_and_persists_profile() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let ctx = context(provider().await, store.clone());
        let mut rx = ctx.subscribe();

        let identity = ctx.login(Credentials::new("ana@example.com", "secret")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().identity(), Some(&identity));
        assert_eq!(ctx.current_user(), Some(identity));
        assert!(store.get(SESSION_TOKEN_KEY).await.unwrap().is_some());

        let profile = ctx.user_data().load().await.unwrap();
        assert_eq!(profile.full_name(), Some("Ana Ruiz"));
        assert_eq!(profile.worker_type(), Some("supervisor"));
    }

    #[tokio::test]
    async fn login_without_metadata_keeps_no_profile() {
        let ctx = context(provider().await, Arc::new(InMemoryKeyValueStore::new()));
        ctx.login(Credentials::new("bo@example.com", "secret")).await.unwrap();

        assert_eq!(ctx.user_data().load().await, None);
    }

    #[tokio::test]
    async fn failed_login_resolves_loading_and_returns_provider_error() {
        let ctx = context(provider().await, Arc::new(InMemoryKeyValueStore::new()));

        let err = ctx.login(Credentials::new("ana@example.com", "nope")).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(ctx.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn failed_login_keeps_existing_session() {
        let ctx = context(provider().await, Arc::new(InMemoryKeyValueStore::new()));
        let identity = ctx.login(Credentials::new("ana@example.com", "secret")).await.unwrap();

        ctx.login(Credentials::new("bo@example.com", "wrong")).await.unwrap_err();

        assert_eq!(ctx.current_user(), Some(identity));
    }

    #[tokio::test]
    async fn restore_uses_persisted_token() {
        let provider = provider().await;
        let store = Arc::new(InMemoryKeyValueStore::new());

        let first = context(provider.clone(), store.clone());
        let identity = first.login(Credentials::new("ana@example.com", "secret")).await.unwrap();

        let second = context(provider, store);
        let state = second.restore().await;
        assert_eq!(state.identity(), Some(&identity));
    }

    #[tokio::test]
    async fn restore_drops_rejected_token() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.put(SESSION_TOKEN_KEY, "stale").await.unwrap();

        let ctx = context(provider().await, store.clone());
        assert_eq!(ctx.restore().await, AuthState::SignedOut);
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
    }

    /// Provider whose token check completes only after a newer token landed.
    struct SlowVerify {
        store: Arc<InMemoryKeyValueStore>,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for SlowVerify {
        async fn sign_in(&self, _: &Credentials) -> Result<crewdash_auth::Session, ProviderError> {
            Err(ProviderError::Unavailable("offline".to_string()))
        }

        async fn verify(&self, _: &str) -> Result<crewdash_auth::Session, ProviderError> {
            self.store.put(SESSION_TOKEN_KEY, "fresh").await.unwrap();
            Err(ProviderError::Unavailable("offline".to_string()))
        }

        async fn sign_out(&self, _: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn restore_keeps_a_token_written_while_verifying() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.put(SESSION_TOKEN_KEY, "stale").await.unwrap();

        let provider = Arc::new(SlowVerify { store: store.clone() });
        let ctx = AuthContext::new(provider, store.clone());

        assert_eq!(ctx.restore().await, AuthState::SignedOut);
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn restore_does_not_override_completed_login() {
        let provider = provider().await;
        let ctx = context(provider, Arc::new(InMemoryKeyValueStore::new()));
        ctx.login(Credentials::new("ana@example.com", "secret")).await.unwrap();

        // The token now in the store is valid, but the state is already resolved.
        let state = ctx.restore().await;
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_everything_and_is_idempotent() {
        let provider = provider().await;
        let store = Arc::new(InMemoryKeyValueStore::new());
        let ctx = context(provider.clone(), store.clone());
        ctx.login(Credentials::new("ana@example.com", "secret")).await.unwrap();
        assert_eq!(provider.active_sessions().await, 1);

        ctx.logout().await;
        ctx.logout().await;

        assert_eq!(ctx.state(), AuthState::SignedOut);
        assert_eq!(ctx.current_user(), None);
        assert_eq!(provider.active_sessions().await, 0);
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
        assert_eq!(ctx.user_data().load().await, None);
    }

    #[tokio::test]
    async fn resolved_waits_for_restore() {
        let ctx = Arc::new(context(provider().await, Arc::new(InMemoryKeyValueStore::new())));

        let waiter = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.resolved().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        ctx.restore().await;
        assert_eq!(waiter.await.unwrap(), AuthState::SignedOut);
    }
}
