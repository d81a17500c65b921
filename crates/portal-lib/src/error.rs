// crates/portal-lib/src/error.rs

//! Central error types + conversion into user-facing messages.
use serde_json::Value;
use thiserror::Error;

/// Field-level validation messages from a 400 response, in the order the
/// backend sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl FieldErrors {
    /// Build from a 400 body. Objects map field → message(s); a bare
    /// string becomes a single `detail` entry.
    pub fn from_body(body: &Value) -> Self {
        let entries = match body {
            Value::Object(map) => map
                .iter()
                .map(|(field, messages)| (field.clone(), messages_of(messages)))
                .collect(),
            Value::String(s) if !s.is_empty() => vec![("detail".to_string(), vec![s.clone()])],
            _ => Vec::new(),
        };
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First message reported for `field`
    pub fn first(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `"field: message"` pairs joined by `", "`, first message per field.
    pub fn joined(&self) -> String {
        self.entries
            .iter()
            .filter_map(|(field, messages)| {
                messages.first().map(|message| format!("{field}: {message}"))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(text_of).collect(),
        other => vec![text_of(other)],
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classified failure of a single API call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    #[error("Bad request: {}", .0.joined())]
    BadRequest(FieldErrors),

    #[error("Forbidden: {}", detail.as_deref().unwrap_or("access denied"))]
    Forbidden { detail: Option<String> },

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Server error (HTTP {status})")]
    ServerError { status: u16, detail: Option<String> },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// The page action an error is reported against. Login and registration
/// have their own wording; everything else uses `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    Login,
    Register,
    /// e.g. `Action("creating event")` → "Error creating event. ..."
    Action(&'a str),
}

impl ApiError {
    /// Classify a non-success response
    pub fn from_status(status: u16, body: &Value) -> Self {
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string);
        match status {
            400 => ApiError::BadRequest(FieldErrors::from_body(body)),
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            _ => ApiError::ServerError { status, detail },
        }
    }

    /// HTTP status behind this error, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::NetworkUnreachable(_) | ApiError::Unknown(_) => None,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "API_401",
            ApiError::BadRequest(_) => "API_400",
            ApiError::Forbidden { .. } => "API_403",
            ApiError::NetworkUnreachable(_) => "NET_001",
            ApiError::ServerError { .. } => "API_5XX",
            ApiError::Unknown(_) => "UNK_001",
        }
    }

    /// Message shown to the user at the page boundary
    pub fn user_message(&self, op: Operation<'_>) -> String {
        match op {
            Operation::Login => self.login_message(),
            Operation::Register => self.register_message(),
            Operation::Action(action) => match self {
                ApiError::BadRequest(fields) if !fields.is_empty() => {
                    format!("Error {action}. {}", fields.joined())
                }
                _ => format!("Error {action}. Please try again."),
            },
        }
    }

    fn login_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => {
                "Invalid username or password. Please try again.".to_string()
            }
            ApiError::BadRequest(fields) => {
                if fields.first("non_field_errors").is_some() {
                    "Invalid username or password. Please check your credentials.".to_string()
                } else if let Some(detail) = fields.first("detail") {
                    detail.to_string()
                } else {
                    "Invalid login credentials. Please check your input.".to_string()
                }
            }
            ApiError::Forbidden { .. } => {
                "Your account is not active. Please contact support.".to_string()
            }
            ApiError::NetworkUnreachable(_) => {
                "Cannot connect to server. Please check your internet connection.".to_string()
            }
            ApiError::ServerError { .. } => "Login failed. Please try again.".to_string(),
            ApiError::Unknown(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    fn register_message(&self) -> String {
        match self {
            ApiError::BadRequest(fields) => {
                for (field, label) in [
                    ("username", "Username"),
                    ("email", "Email"),
                    ("password", "Password"),
                ] {
                    if let Some(message) = fields.first(field) {
                        return format!("{label}: {message}");
                    }
                }
                fields
                    .first("non_field_errors")
                    .or_else(|| fields.first("detail"))
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        "Please check your registration details and try again.".to_string()
                    })
            }
            ApiError::ServerError { status: 409, .. } => {
                "An account with this username or email already exists.".to_string()
            }
            ApiError::NetworkUnreachable(_) => {
                "Network error. Please check your connection.".to_string()
            }
            ApiError::Unknown(_) => "An unexpected error occurred.".to_string(),
            _ => "Registration failed. Please try again.".to_string(),
        }
    }
}

/// The stored user blob could not be decoded
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Malformed session: {0}")]
    MalformedSession(#[from] serde_json::Error),
}

/// Failure of a persistent key/value scope
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PortalError {
    /// Message shown to the user; input errors are already user-facing.
    pub fn user_message(&self, op: Operation<'_>) -> String {
        match self {
            PortalError::Api(err) => err.user_message(op),
            PortalError::InvalidInput(msg) => msg.clone(),
            _ => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

impl From<figment::Error> for PortalError {
    fn from(err: figment::Error) -> Self {
        PortalError::Config(err.to_string())
    }
}
