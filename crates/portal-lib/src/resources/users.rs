//! Administrator user management under `auth/users/`.
use cpec_common::{RecordId, RoleUpdate};
use serde_json::Value;

use super::fetch_list;
use crate::error::ApiError;
use crate::http::ApiClient;

pub const USERS_PATH: &str = "auth/users/";
pub const USERS_KEY: &str = "users";

#[derive(Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, USERS_PATH, None, USERS_KEY).await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, USERS_PATH, Some(limit), USERS_KEY).await
    }

    /// Toggles the verified flag server-side
    pub async fn verify(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.post_empty(&format!("{USERS_PATH}{id}/verify/")).await
    }

    pub async fn set_role(&self, id: &RecordId, role: &str) -> Result<Value, ApiError> {
        let body = RoleUpdate {
            role: role.to_string(),
        };
        self.client.put(&format!("{USERS_PATH}{id}/"), &body).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.client.delete(&format!("{USERS_PATH}{id}/")).await?;
        Ok(())
    }
}
