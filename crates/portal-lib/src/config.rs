// ============================
// portal-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::PortalError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Remote API settings
    pub api: ApiSettings,
    /// Local persistence settings
    pub storage: StorageSettings,
    /// Log level
    pub log_level: String,
}

/// Remote API settings shared by the auth and resource clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every request path is resolved against
    pub base_url: String,
    /// Fixed diagnostic header sent with every request
    pub diagnostic_header: String,
    pub diagnostic_value: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Where the durable ("remember me") scope is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            diagnostic_header: "ngrok-skip-browser-warning".to_string(),
            diagnostic_value: "true".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load settings from `portal.toml`, `portal.json` and `PORTAL_*` env vars
    pub fn load() -> Result<Self, PortalError> {
        let figment = Self::figment()
            .merge(Toml::file("portal.toml"))
            .merge(Json::file("portal.json"))
            .merge(Env::prefixed("PORTAL_").split("__"));
        Self::extract(figment)
    }

    /// Load settings from a specific TOML file, still honouring env overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, PortalError> {
        let figment = Self::figment()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("PORTAL_").split("__"));
        Self::extract(figment)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    fn extract(figment: Figment) -> Result<Self, PortalError> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), PortalError> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| PortalError::Config(format!("invalid base URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PortalError::Config(format!(
                "base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.api.diagnostic_header.trim().is_empty() {
            return Err(PortalError::Config("diagnostic header name is empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(PortalError::Config("timeout must be greater than 0".into()));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(PortalError::Config(format!(
                "invalid log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}
