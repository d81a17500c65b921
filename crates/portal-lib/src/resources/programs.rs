//! `programs/*` endpoints.
use cpec_common::RecordId;
use serde_json::Value;

use super::fetch_list;
use crate::error::ApiError;
use crate::http::{ApiClient, MultipartForm};

pub const PROGRAMS_PATH: &str = "programs/";
pub const PROGRAMS_KEY: &str = "programs";

#[derive(Clone)]
pub struct ProgramsApi {
    client: ApiClient,
}

impl ProgramsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, PROGRAMS_PATH, None, PROGRAMS_KEY).await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<Value>, ApiError> {
        fetch_list(&self.client, PROGRAMS_PATH, Some(limit), PROGRAMS_KEY).await
    }

    pub async fn create(&self, form: MultipartForm) -> Result<Value, ApiError> {
        self.client.post_multipart("programs/create/", form).await
    }

    pub async fn enroll(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.client.post_empty(&format!("programs/{id}/enroll/")).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.client.delete(&format!("programs/{id}/delete/")).await?;
        Ok(())
    }
}
