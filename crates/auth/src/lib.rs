//! Persisted session credentials.
//!
//! [`SessionStore`] keeps the bearer token and the user descriptor it was
//! issued for under two keys of a [`KeyValueStore`]. Both keys are always
//! written and removed as one group, so a credential is never half-present.
//! Reads never fail: an unreadable or corrupt store is reported as "not
//! logged in". Writes propagate storage faults to the caller.

use campus_storage::{KeyValueStore, StorageError};
use thiserror::Error;
use tracing::{debug, warn};

pub mod user;

pub use user::{Credential, UserDescriptor, UserRole, UserStatus};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode user descriptor: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Persist the token and user together, replacing any previous credential.
    pub async fn save(&self, token: &str, user: &UserDescriptor) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(user)?;
        self.store
            .multi_set(&[(TOKEN_KEY, token.to_owned()), (USER_KEY, encoded)])
            .await?;
        debug!(user_id = user.id, "credential saved");
        Ok(())
    }

    pub async fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, "failed to read stored token, treating as logged out");
                None
            }
        }
    }

    pub async fn user(&self) -> Option<UserDescriptor> {
        let raw = match self.store.get(USER_KEY).await {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(%error, "failed to read stored user, treating as logged out");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(%error, "stored user descriptor is malformed");
                None
            }
        }
    }

    /// Token and user together, or `None` unless both are readable.
    pub async fn credential(&self) -> Option<Credential> {
        let token = self.token().await?;
        let user = self.user().await?;
        Some(Credential { token, user })
    }

    /// Local presence check only; the token is not validated.
    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        self.store.multi_remove(&[TOKEN_KEY, USER_KEY]).await?;
        debug!("credential cleared");
        Ok(())
    }
}
