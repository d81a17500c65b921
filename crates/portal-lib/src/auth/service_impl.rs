use async_trait::async_trait;
use cpec_common::{AuthTokens, LoginRequest, RegisterRequest, UserRecord};
use tracing::{info, warn};

use super::{AuthService, LogoutFlow, RegisterOutcome, TokenStore};
use crate::error::{ApiError, PortalError};
use crate::http::ApiClient;

pub const LOGIN_PATH: &str = "auth/login/";
pub const REGISTER_PATH: &str = "auth/register/";

pub struct DefaultAuth {
    client: ApiClient,
    tokens: TokenStore,
    logout: LogoutFlow,
}

impl DefaultAuth {
    /// `client` must be the auth-endpoint client.
    pub fn new(client: ApiClient, tokens: TokenStore, logout: LogoutFlow) -> Self {
        Self {
            client,
            tokens,
            logout,
        }
    }

    async fn fetch_tokens(&self, username: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let body = self
            .client
            .post(
                LOGIN_PATH,
                &LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Unknown(format!("unexpected login response: {e}")))
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserRecord, PortalError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(PortalError::InvalidInput(
                "Please enter both username and password".to_string(),
            ));
        }

        let tokens = self.fetch_tokens(username, password).await?;
        self.tokens.save(&tokens, remember)?;
        info!(username = %tokens.user.username, remember, "login succeeded");
        Ok(tokens.user)
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisterOutcome, PortalError> {
        let request = RegisterRequest {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            ..request
        };
        if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
            return Err(PortalError::InvalidInput(
                "Please fill in all required fields".to_string(),
            ));
        }
        if request.password != request.confirm_password {
            return Err(PortalError::InvalidInput("Passwords do not match".to_string()));
        }

        self.client.post(REGISTER_PATH, &request).await?;
        info!(username = %request.username, "account registered");

        // a failed automatic sign-in does not undo the registration
        let tokens = match self.fetch_tokens(&request.username, &request.password).await {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "automatic login after registration failed");
                return Ok(RegisterOutcome::LoginRequired);
            }
        };
        if let Err(err) = self.tokens.save(&tokens, true) {
            warn!(error = %err, "could not store session after registration");
            return Ok(RegisterOutcome::LoginRequired);
        }
        Ok(RegisterOutcome::SignedIn(tokens.user))
    }

    async fn logout(&self) {
        self.logout.run().await;
    }
}
