use async_trait::async_trait;
use cpec_common::{RegisterRequest, UserRecord};

use crate::error::PortalError;

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// Account created and signed in (durable scope)
    SignedIn(UserRecord),
    /// Account created but the automatic sign-in failed; send the user to
    /// the login view.
    LoginRequired,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserRecord, PortalError>;
    async fn register(&self, request: RegisterRequest) -> Result<RegisterOutcome, PortalError>;
    async fn logout(&self);
}
