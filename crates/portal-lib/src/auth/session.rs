// ============================
// portal-lib/src/auth/session.rs
// ============================
//! Session queries derived from the token store.
use cpec_common::UserRecord;
use tracing::warn;

use super::token_store::TokenStore;
use crate::error::SessionError;

/// Role value that grants administrator capability
pub const ADMIN_ROLE: &str = "admin";

/// Administrator status has been exposed under several names over the
/// backend's lifetime. A user is an administrator if ANY of these holds:
///
/// * `is_admin` is truthy
/// * `is_staff` is truthy
/// * `is_superuser` is truthy
/// * `role == "admin"`
pub fn is_admin_record(user: &UserRecord) -> bool {
    user.is_admin || user.is_staff || user.is_superuser || user.role.as_deref() == Some(ADMIN_ROLE)
}

/// `"first last"`, else `first`, else `username` (possibly empty)
pub fn display_name(user: &UserRecord) -> String {
    let first = user.first_name.as_deref().filter(|s| !s.is_empty());
    let last = user.last_name.as_deref().filter(|s| !s.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_string(),
        _ => user.username.clone(),
    }
}

/// Decode a stored user blob
pub fn parse_user(json: &str) -> Result<UserRecord, SessionError> {
    Ok(serde_json::from_str(json)?)
}

/// Answers "who is signed in" from whatever the token store holds.
/// Nothing is cached; every call re-reads storage.
#[derive(Clone)]
pub struct SessionOracle {
    tokens: TokenStore,
}

impl SessionOracle {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.read().is_some()
    }

    /// The stored user, or `None` when signed out or the blob is malformed
    pub fn get_user(&self) -> Option<UserRecord> {
        let json = self.tokens.read()?.user_json?;
        match parse_user(&json) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session user");
                None
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.get_user().is_some_and(|user| is_admin_record(&user))
    }

    /// Display name of the current user, empty when signed out
    pub fn display_name(&self) -> String {
        self.get_user()
            .map(|user| display_name(&user))
            .unwrap_or_default()
    }
}
