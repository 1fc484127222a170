//! Session management on the local key-value store

use std::sync::Arc;

use api::models::UserProfile;
use common::{KeyValueStore, StoreError, StoreResult};
use tracing::{info, warn};

const ACCESS_TOKEN_KEY: &str = "access_token";
const USER_ID_KEY: &str = "user_id";
const USER_DATA_KEY: &str = "user_data";

/// Session store for the access token, user id and cached profile
///
/// Last writer wins; there is no merge between saves.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a session, overwriting every field
    ///
    /// A missing profile removes any previously cached one.
    pub async fn save(
        &self,
        access_token: &str,
        user_id: i64,
        profile: Option<&UserProfile>,
    ) -> StoreResult<()> {
        info!("Saving session for user: {}", user_id);

        self.store.set(ACCESS_TOKEN_KEY, access_token).await?;
        self.store.set(USER_ID_KEY, &user_id.to_string()).await?;
        match profile {
            Some(profile) => self.save_profile(profile).await?,
            None => self.store.delete(USER_DATA_KEY).await?,
        }

        Ok(())
    }

    /// Replace the cached profile snapshot
    pub async fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        let blob = serde_json::to_string(profile).map_err(|e| StoreError::Serialization {
            key: USER_DATA_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(USER_DATA_KEY, &blob).await
    }

    /// Stored access token, if any
    pub async fn access_token(&self) -> StoreResult<Option<String>> {
        let token = self.store.get(ACCESS_TOKEN_KEY).await?;
        Ok(token.filter(|token| !token.is_empty()))
    }

    /// Stored user id, if any
    ///
    /// There is no fallback id: callers that need one treat `None` as
    /// an unauthenticated session.
    pub async fn user_id(&self) -> StoreResult<Option<i64>> {
        let raw = self.store.get(USER_ID_KEY).await?;
        Ok(raw.and_then(|raw| match raw.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Ignoring unreadable stored user id {:?}: {}", raw, e);
                None
            }
        }))
    }

    /// Cached profile; an undecodable blob reads as no profile
    pub async fn user_profile(&self) -> StoreResult<Option<UserProfile>> {
        let Some(blob) = self.store.get(USER_DATA_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&blob) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Ignoring unreadable cached user profile: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove every session key
    pub async fn clear(&self) -> StoreResult<()> {
        info!("Clearing session");

        self.store.delete(ACCESS_TOKEN_KEY).await?;
        self.store.delete(USER_ID_KEY).await?;
        self.store.delete(USER_DATA_KEY).await?;

        Ok(())
    }
}
