// ============================
// portal-lib/src/resources/mod.rs
// ============================
//! Typed wrappers over the resource endpoints.

pub mod dashboard;
pub mod events;
pub mod filter;
pub mod programs;
pub mod users;

pub use dashboard::{load_dashboard, load_home_summary, DashboardApi, DashboardView, HomeSummary};
pub use events::EventsApi;
pub use filter::{
    user_counts, EventFilter, EventShow, ListFilter, ProgramFilter, ProgramShow, UserCounts,
    UserFilter,
};
pub use programs::ProgramsApi;
pub use users::UsersApi;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};
use crate::normalize::into_list;

/// GET a list endpoint and normalize whatever wrapper it uses
pub(crate) async fn fetch_list(
    client: &ApiClient,
    path: &str,
    limit: Option<usize>,
    domain_key: &str,
) -> Result<Vec<Value>, ApiError> {
    let mut request = ApiRequest::get(path);
    if let Some(limit) = limit {
        request = request.query("limit", limit);
    }
    let payload = client.send(request).await?;
    Ok(into_list(payload, Some(domain_key)))
}

/// Size of a list payload: a positive `count` field if present, else the
/// number of normalized records.
pub fn record_count(payload: &Value, domain_key: &str) -> u64 {
    payload
        .get("count")
        .and_then(Value::as_u64)
        .filter(|count| *count > 0)
        .unwrap_or_else(|| crate::normalize::normalize_list(payload, Some(domain_key)).len() as u64)
}
