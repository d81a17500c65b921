//! `events/*` endpoints.
use cpec_common::RecordId;
use serde_json::Value;

use super::fetch_list;
use crate::error::ApiError;
use crate::http::{ApiClient, MultipartForm};

pub const EVENTS_PATH: &str = "events/";
pub const EVENTS_KEY: &str = "events";

#[derive(Clone)]
pub struct EventsApi {
    client: ApiClient,
}

impl EventsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, EVENTS_PATH, None, EVENTS_KEY).await
    }

    /// First `limit` events, as shown on the dashboard
    pub async fn recent(&self, limit: usize) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, EVENTS_PATH, Some(limit), EVENTS_KEY).await
    }

    pub async fn get(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.get(&format!("events/{id}/")).await
    }

    /// Multipart so an image can ride along with the fields
    pub async fn create(&self, form: MultipartForm) -> Result<Value, ApiError> {
        self.client.post_multipart("events/create/", form).await
    }

    pub async fn update(&self, id: &RecordId, event: &Value) -> Result<Value, ApiError> {
        self.client.put(&format!("events/{id}/update/"), event).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.client.delete(&format!("events/{id}/delete/")).await?;
        Ok(())
    }

    pub async fn attend(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.post_empty(&format!("events/{id}/attend/")).await
    }

    pub async fn unattend(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.delete(&format!("events/{id}/unattend/")).await
    }
}
