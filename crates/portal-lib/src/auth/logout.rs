// ============================
// portal-lib/src/auth/logout.rs
// ============================
//! Sign-out: notify the server, wipe local state, reload home.
use std::sync::Arc;

use cpec_common::LogoutRequest;
use tracing::{error, info, warn};

use super::TokenStore;
use crate::http::ApiClient;
use crate::routes::{Navigator, Route};

pub const LOGOUT_PATH: &str = "auth/logout/";

/// The three steps run unconditionally and in order; none depends on the
/// previous one succeeding, and nothing is reported back to the caller.
#[derive(Clone)]
pub struct LogoutFlow {
    client: ApiClient,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
}

impl LogoutFlow {
    pub fn new(client: ApiClient, tokens: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            client,
            tokens,
            navigator,
        }
    }

    pub async fn run(&self) {
        self.invalidate_refresh_token().await;

        if let Err(err) = self.tokens.clear() {
            error!(error = %err, "failed to clear local storage during logout");
        }
        info!("signed out");

        self.navigator.hard_reload(Route::Home);
    }

    /// Best-effort side effect; the outcome is logged and dropped.
    async fn invalidate_refresh_token(&self) {
        let Some(refresh) = self.tokens.refresh_token() else {
            return;
        };
        if let Err(err) = self
            .client
            .post(LOGOUT_PATH, &LogoutRequest { refresh })
            .await
        {
            warn!(error = %err, "logout notification failed");
        }
    }
}
