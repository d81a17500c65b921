// ============================
// portal-lib/src/http/client.rs
// ============================
//! Configured request issuer for the remote API.
//!
//! Two instances are built from the same [`ApiSettings`]: one for the
//! `auth/*` endpoints and one for every other resource. They share base
//! URL, timeout and the diagnostic header; the resource client also
//! attaches the current bearer token. Neither refreshes tokens or retries.
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::form::MultipartForm;
use crate::auth::TokenStore;
use crate::config::ApiSettings;
use crate::error::{ApiError, PortalError};
use crate::metrics::{API_FAILURE, API_REQUEST};

/// Body of an outbound request
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A single API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Unknown(format!("unserializable body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
    tokens: Option<TokenStore>,
}

impl ApiClient {
    /// Client for `auth/*` endpoints; sends no bearer token
    pub fn auth(settings: &ApiSettings) -> Result<Self, PortalError> {
        Self::build(settings, None)
    }

    /// Client for resource endpoints; attaches the stored access token
    pub fn resources(settings: &ApiSettings, tokens: TokenStore) -> Result<Self, PortalError> {
        Self::build(settings, Some(tokens))
    }

    fn build(settings: &ApiSettings, tokens: Option<TokenStore>) -> Result<Self, PortalError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| PortalError::Config(format!("invalid base URL: {e}")))?;

        let mut headers = HeaderMap::new();
        let name = HeaderName::from_bytes(settings.diagnostic_header.as_bytes())
            .map_err(|e| PortalError::Config(format!("invalid diagnostic header: {e}")))?;
        let value = HeaderValue::from_str(&settings.diagnostic_value)
            .map_err(|e| PortalError::Config(format!("invalid diagnostic header value: {e}")))?;
        headers.insert(name, value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| PortalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base,
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL. Leading slashes on the path
    /// are ignored so `/events/` and `events/` hit the same endpoint.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::Unknown(format!("invalid path {path}: {e}")))
    }

    /// Issue a request, returning the parsed JSON body on 2xx.
    /// An empty body parses as `null`; a non-JSON body as a string.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        counter!(API_REQUEST).increment(1);
        let result = self.dispatch(request).await;
        if result.is_err() {
            counter!(API_FAILURE).increment(1);
        }
        result
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(session) = self.tokens.as_ref().and_then(TokenStore::read) {
            builder = builder.bearer_auth(session.access);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(form.to_reqwest()?),
        };

        let response = builder.send().await.map_err(classify_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(classify_transport)?;
        debug!(status = status.as_u16(), path = %request.path, "response received");

        let body = parse_body(&text);
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        self.send(ApiRequest::new(Method::POST, path).json(body)?).await
    }

    /// POST with no body
    pub async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.send(ApiRequest::new(Method::POST, path)).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        self.send(ApiRequest::new(Method::PUT, path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    pub async fn post_multipart(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        self.send(ApiRequest::new(Method::POST, path).multipart(form))
            .await
    }
}

fn classify_transport(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        ApiError::NetworkUnreachable(err.to_string())
    } else {
        ApiError::Unknown(err.to_string())
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
