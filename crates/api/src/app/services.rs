//! Service wiring shared by handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crewdash_auth::IdentityProvider;
use crewdash_core::{ApiError, ApiResult, UserData, UserId};

pub struct AppServices {
    pub provider: Arc<dyn IdentityProvider>,
    pub profiles: ProfileStore,
}

impl AppServices {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            profiles: ProfileStore::new(),
        }
    }
}

/// In-memory server-side profile store, keyed by user.
#[derive(Debug, Default)]
pub struct ProfileStore {
    inner: RwLock<BTreeMap<UserId, UserData>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: UserId) -> Option<UserData> {
        self.inner.read().await.get(&user_id).cloned()
    }

    /// Insert or replace.
    pub async fn upsert(&self, user_id: UserId, profile: UserData) {
        self.inner.write().await.insert(user_id, profile);
    }

    /// Insert only if absent.
    pub async fn create(&self, user_id: UserId, profile: UserData) -> ApiResult<()> {
        let mut inner = self.inner.write().await;
        if inner.contains_key(&user_id) {
            return Err(ApiError::conflict(Some("Profile already exists")));
        }
        inner.insert(user_id, profile);
        Ok(())
    }

    pub async fn remove(&self, user_id: UserId) -> ApiResult<()> {
        self.inner
            .write()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(Some("Profile")))
    }

    pub async fn list(&self) -> Vec<(UserId, UserData)> {
        self.inner
            .read()
            .await
            .iter()
            .map(|(id, p)| (*id, p.clone()))
            .collect()
    }
}
