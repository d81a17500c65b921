// ============================
// portal-lib/src/auth/token_store.rs
// ============================
//! Access/refresh token persistence across the two storage scopes.
use std::sync::Arc;

use cpec_common::AuthTokens;
use metrics::counter;
use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::metrics::{SESSION_CLEARED, SESSION_SAVED};
use crate::storage::{KeyValueStore, Scope};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_INFO_KEY: &str = "user_info";

/// Session values read back from a single scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub access: String,
    pub refresh: Option<String>,
    /// Serialized user record, parsed lazily by the session oracle
    pub user_json: Option<String>,
    pub scope: Scope,
}

/// Reads and writes the session triple. Cloning shares the backing store.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Write all three values into the durable scope if `durable`, else the
    /// ephemeral one. The other scope is left untouched. If any write
    /// fails, the keys of this save are removed again so a scope never
    /// holds part of a session.
    pub fn save(&self, tokens: &AuthTokens, durable: bool) -> Result<(), StorageError> {
        let scope = if durable { Scope::Durable } else { Scope::Ephemeral };
        let user_json = serde_json::to_string(&tokens.user)?;
        let entries = [
            (ACCESS_TOKEN_KEY, tokens.access.as_str()),
            (REFRESH_TOKEN_KEY, tokens.refresh.as_str()),
            (USER_INFO_KEY, user_json.as_str()),
        ];

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(err) = self.store.set(scope, key, value) {
                warn!(?scope, key, error = %err, "session save failed, rolling back");
                self.discard(scope, entries[..=written].iter().map(|(key, _)| *key));
                return Err(err);
            }
        }

        counter!(SESSION_SAVED).increment(1);
        debug!(?scope, "session saved");
        Ok(())
    }

    fn discard<'a>(&self, scope: Scope, keys: impl Iterator<Item = &'a str>) {
        for key in keys {
            if let Err(err) = self.store.remove(scope, key) {
                error!(?scope, key, error = %err, "could not remove partial session value");
            }
        }
    }

    /// First scope (durable, then ephemeral) holding a non-empty access
    /// token. Values are never mixed across scopes.
    pub fn read(&self) -> Option<StoredSession> {
        Scope::ALL.into_iter().find_map(|scope| {
            let access = self
                .store
                .get(scope, ACCESS_TOKEN_KEY)
                .filter(|token| !token.is_empty())?;
            Some(StoredSession {
                access,
                refresh: self.store.get(scope, REFRESH_TOKEN_KEY),
                user_json: self.store.get(scope, USER_INFO_KEY),
                scope,
            })
        })
    }

    /// Refresh token from the durable scope, else the ephemeral one.
    /// Looked up on its own, without requiring an access token.
    pub fn refresh_token(&self) -> Option<String> {
        Scope::ALL
            .into_iter()
            .find_map(|scope| self.store.get(scope, REFRESH_TOKEN_KEY).filter(|t| !t.is_empty()))
    }

    /// Empty both scopes entirely, including keys this store never wrote.
    /// Both scopes are attempted even if the first fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let durable = self.store.clear(Scope::Durable);
        let ephemeral = self.store.clear(Scope::Ephemeral);
        counter!(SESSION_CLEARED).increment(1);
        durable.and(ephemeral)
    }
}
