//! Persisted profile of the signed-in user.

use std::sync::Arc;

use thiserror::Error;

use crewdash_core::UserData;

use crate::store::KeyValueStore;

/// Slot holding the JSON-encoded [`UserData`].
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored user data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the `user_data` slot.
///
/// Storage problems never surface to callers: writes are fire-and-forget
/// and unreadable values degrade to "nothing stored".
#[derive(Clone)]
pub struct UserDataStore {
    store: Arc<dyn KeyValueStore>,
}

impl UserDataStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the stored profile.
    pub async fn save(&self, data: &UserData) {
        let raw = match serde_json::to_string(data) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode user data");
                return;
            }
        };

        if let Err(err) = self.store.put(USER_DATA_KEY, &raw).await {
            tracing::warn!(error = %err, key = USER_DATA_KEY, "failed to persist user data");
        }
    }

    pub fn decode(raw: &str) -> Result<UserData, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn load(&self) -> Option<UserData> {
        let raw = match self.store.get(USER_DATA_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, key = USER_DATA_KEY, "failed to read user data");
                return None;
            }
        };

        match Self::decode(&raw) {
            Ok(data) if data.is_empty() => {
                tracing::debug!(key = USER_DATA_KEY, "stored user data has no fields");
                None
            }
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(error = %err, key = USER_DATA_KEY, "discarding unreadable user data");
                None
            }
        }
    }

    /// Remove the stored profile. Clearing an empty slot is a no-op.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(USER_DATA_KEY).await {
            tracing::warn!(error = %err, key = USER_DATA_KEY, "failed to clear user data");
        }
    }
}
