// ============================
// portal-lib/src/lib.rs
// ============================
//! Core client library for the CPEC community portal: session storage,
//! authorization gate, API access and response normalization.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod normalize;
pub mod resources;
pub mod routes;
pub mod storage;
pub mod view;

use std::sync::Arc;

use crate::auth::{DefaultAuth, LogoutFlow, SessionOracle, TokenStore};
use crate::config::Settings;
use crate::error::PortalError;
use crate::http::ApiClient;
use crate::resources::{DashboardApi, EventsApi, ProgramsApi, UsersApi};
use crate::routes::{Navigator, RouteGuard};
use crate::storage::{FlatFileStore, KeyValueStore};

/// Application state shared across all views
#[derive(Clone)]
pub struct Portal {
    /// Settings the clients were built from
    pub settings: Arc<Settings>,
    /// Session token persistence
    pub tokens: TokenStore,
    /// Session queries
    pub oracle: SessionOracle,
    /// Navigation gate
    pub guard: RouteGuard,
    /// Login, registration and logout
    pub auth: Arc<DefaultAuth>,
    /// Client for resource endpoints (carries the bearer token)
    pub api: ApiClient,
    pub events: EventsApi,
    pub programs: ProgramsApi,
    pub users: UsersApi,
    pub dashboard: DashboardApi,
}

impl Portal {
    /// Wire every component over the given store and navigator
    pub fn new(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, PortalError> {
        settings.validate()?;

        let tokens = TokenStore::new(store);
        let oracle = SessionOracle::new(tokens.clone());
        let guard = RouteGuard::new(oracle.clone());

        let auth_client = ApiClient::auth(&settings.api)?;
        let api = ApiClient::resources(&settings.api, tokens.clone())?;
        let logout = LogoutFlow::new(api.clone(), tokens.clone(), navigator);
        let auth = Arc::new(DefaultAuth::new(auth_client, tokens.clone(), logout));

        Ok(Self {
            settings: Arc::new(settings),
            tokens,
            oracle,
            guard,
            auth,
            events: EventsApi::new(api.clone()),
            programs: ProgramsApi::new(api.clone()),
            users: UsersApi::new(api.clone()),
            dashboard: DashboardApi::new(api.clone()),
            api,
        })
    }

    /// Portal backed by the flat-file store under `settings.storage.path`
    pub fn open(settings: Settings, navigator: Arc<dyn Navigator>) -> Result<Self, PortalError> {
        let store = Arc::new(FlatFileStore::open(&settings.storage.path)?);
        Self::new(settings, store, navigator)
    }
}
