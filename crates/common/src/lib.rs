// ================
// common/src/lib.rs
// ================
//! Wire types shared between the CPEC portal client library and its CLI.
//! These mirror the JSON bodies exchanged with the community platform API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a remote record. The API hands out integer keys, but
/// some endpoints echo them back as strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// User record as returned by the authentication endpoints.
///
/// Only the fields the client inspects are typed; everything else the
/// backend sends is kept verbatim in `extra` so the record survives a
/// save/load cycle through local storage unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub is_staff: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub is_superuser: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Truthiness of a loosely typed JSON value: `null`, `false`, `0`, `NaN`
/// and `""` are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

/// Body returned by `auth/login/`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthTokens {
    /// Bearer token attached to resource requests
    pub access: String,
    /// Token handed back to `auth/logout/` for invalidation
    pub refresh: String,
    /// The signed-in user
    pub user: UserRecord,
}

/// Credentials posted to `auth/login/`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account details posted to `auth/register/`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body posted to `auth/logout/`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogoutRequest {
    pub refresh: String,
}

/// Body sent to `auth/users/{id}/` when an administrator changes a role
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoleUpdate {
    pub role: String,
}

/// Aggregate counters served by `admin/dashboard/`.
/// Missing counters, and counters the backend sends as `null` or some
/// other non-count value, read as zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "count")]
    pub total_users: u64,
    #[serde(deserialize_with = "count")]
    pub total_events: u64,
    #[serde(deserialize_with = "count")]
    pub total_programs: u64,
    #[serde(deserialize_with = "count")]
    pub pending_requests: u64,
    #[serde(deserialize_with = "count")]
    pub new_members_today: u64,
    #[serde(deserialize_with = "count")]
    pub upcoming_events: u64,
    #[serde(deserialize_with = "count")]
    pub active_programs: u64,
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
