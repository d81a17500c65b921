// ============================
// portal-lib/src/resources/dashboard.rs
// ============================
//! Dashboard statistics plus the fan-out loaders behind the dashboard and
//! home views.
//!
//! Both loaders issue their calls concurrently and wait for all of them.
//! Each call settles on its own: a failure empties that one section and
//! leaves the others intact.
use cpec_common::DashboardStats;
use serde_json::Value;
use tracing::warn;

use super::events::{EVENTS_KEY, EVENTS_PATH};
use super::programs::{PROGRAMS_KEY, PROGRAMS_PATH};
use super::{record_count, EventsApi, ProgramsApi, UsersApi};
use crate::auth::SessionOracle;
use crate::error::{ApiError, Operation};
use crate::http::ApiClient;

pub const DASHBOARD_PATH: &str = "admin/dashboard/";

/// How many recent records each dashboard section shows
pub const RECENT_LIMIT: usize = 5;

#[derive(Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.client.get(DASHBOARD_PATH).await?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Unknown(format!("unexpected dashboard response: {e}")))
    }
}

/// Everything the administrator dashboard renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub events: Vec<Value>,
    pub programs: Vec<Value>,
    pub users: Vec<Value>,
    /// One user-facing message per failed section
    pub errors: Vec<String>,
}

/// Load the dashboard. Never fails as a whole.
pub async fn load_dashboard(client: &ApiClient) -> DashboardView {
    let stats_api = DashboardApi::new(client.clone());
    let events_api = EventsApi::new(client.clone());
    let programs_api = ProgramsApi::new(client.clone());
    let users_api = UsersApi::new(client.clone());

    let (stats, events, programs, users) = tokio::join!(
        stats_api.stats(),
        events_api.recent(RECENT_LIMIT),
        programs_api.recent(RECENT_LIMIT),
        users_api.recent(RECENT_LIMIT),
    );

    let mut errors = Vec::new();
    DashboardView {
        stats: settle(stats, "loading dashboard statistics", &mut errors),
        events: settle(events, "loading recent events", &mut errors),
        programs: settle(programs, "loading recent programs", &mut errors),
        users: settle(users, "loading recent users", &mut errors),
        errors,
    }
}

/// Counters on the public home view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSummary {
    pub events: u64,
    pub programs: u64,
    /// Only fetched for administrators
    pub admin_stats: Option<DashboardStats>,
    /// One user-facing message per counter that failed to load
    pub errors: Vec<String>,
}

pub async fn load_home_summary(client: &ApiClient, oracle: &SessionOracle) -> HomeSummary {
    let is_admin = oracle.is_admin();
    let stats_api = DashboardApi::new(client.clone());

    let admin_stats = async {
        if is_admin {
            Some(stats_api.stats().await)
        } else {
            None
        }
    };
    let (events, programs, admin_stats) = tokio::join!(
        client.get(EVENTS_PATH),
        client.get(PROGRAMS_PATH),
        admin_stats,
    );

    let mut errors = Vec::new();
    let events: Value = settle(events, "loading events", &mut errors);
    let programs: Value = settle(programs, "loading programs", &mut errors);
    HomeSummary {
        events: record_count(&events, EVENTS_KEY),
        programs: record_count(&programs, PROGRAMS_KEY),
        admin_stats: admin_stats.and_then(|stats| match stats {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(error = %err, "admin statistics unavailable");
                None
            }
        }),
        errors,
    }
}

fn settle<T: Default>(result: Result<T, ApiError>, action: &str, errors: &mut Vec<String>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, action, "section failed to load");
            errors.push(err.user_message(Operation::Action(action)));
            T::default()
        }
    }
}
