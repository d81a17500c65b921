// ============================
// portal-lib/src/resources/filter.rs
// ============================
//! Client-side narrowing of normalized lists.
//!
//! Records are loose JSON, so every field lookup tolerates absence: a
//! missing or non-string field never matches a search, and a record that
//! is not an object is always dropped.
use cpec_common::is_truthy;
use serde_json::Value;

use crate::auth::session::ADMIN_ROLE;

/// Predicate over one normalized record
pub trait ListFilter {
    fn keep(&self, record: &Value) -> bool;

    fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        records.into_iter().filter(|record| self.keep(record)).collect()
    }
}

/// Lowercased search term; blank terms disable the search
fn search_term(term: &Option<String>) -> Option<String> {
    term.as_deref()
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

fn any_field_contains(record: &Value, fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|field| {
        record
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

fn field_is(record: &Value, field: &str, expected: &str) -> bool {
    record.get(field).and_then(Value::as_str) == Some(expected)
}

fn flag(record: &Value, field: &str) -> bool {
    record.get(field).is_some_and(is_truthy)
}

/// What the events list shows besides the search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventShow {
    #[default]
    All,
    /// `upcoming`, `past` or `ongoing`, matched against `status`
    Status(String),
    /// Anything else is a category
    Category(String),
}

impl EventShow {
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "all" => EventShow::All,
            "upcoming" | "past" | "ongoing" => EventShow::Status(value.to_string()),
            other => EventShow::Category(other.to_string()),
        }
    }
}

/// Title/description search plus status or category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub search: Option<String>,
    pub show: EventShow,
}

impl ListFilter for EventFilter {
    fn keep(&self, record: &Value) -> bool {
        if !record.is_object() {
            return false;
        }
        if let Some(term) = search_term(&self.search) {
            if !any_field_contains(record, &["title", "description"], &term) {
                return false;
            }
        }
        match &self.show {
            EventShow::All => true,
            EventShow::Status(status) => field_is(record, "status", status),
            EventShow::Category(category) => field_is(record, "category", category),
        }
    }
}

/// What the programs list shows besides the search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProgramShow {
    #[default]
    All,
    /// `is_active` is truthy
    Active,
    /// `enrollment_open` is truthy
    EnrollmentOpen,
    Category(String),
}

impl ProgramShow {
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "all" => ProgramShow::All,
            "active" => ProgramShow::Active,
            "enrollment_open" => ProgramShow::EnrollmentOpen,
            other => ProgramShow::Category(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFilter {
    pub search: Option<String>,
    pub show: ProgramShow,
}

impl ListFilter for ProgramFilter {
    fn keep(&self, record: &Value) -> bool {
        if !record.is_object() {
            return false;
        }
        if let Some(term) = search_term(&self.search) {
            if !any_field_contains(record, &["title", "description"], &term) {
                return false;
            }
        }
        match &self.show {
            ProgramShow::All => true,
            ProgramShow::Active => flag(record, "is_active"),
            ProgramShow::EnrollmentOpen => flag(record, "enrollment_open"),
            ProgramShow::Category(category) => field_is(record, "category", category),
        }
    }
}

/// Username/email search plus role and verification status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
    pub verified: Option<bool>,
}

impl ListFilter for UserFilter {
    fn keep(&self, record: &Value) -> bool {
        if !record.is_object() {
            return false;
        }
        if let Some(term) = search_term(&self.search) {
            if !any_field_contains(record, &["username", "email"], &term) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if !field_is(record, "role", role) {
                return false;
            }
        }
        match self.verified {
            Some(verified) => flag(record, "is_verified") == verified,
            None => true,
        }
    }
}

/// Headline figures above the user management table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub total: usize,
    pub admins: usize,
    pub verified: usize,
}

/// Counted over the unfiltered list. Admins here means `role == "admin"`
/// only, as the table labels them.
pub fn user_counts(records: &[Value]) -> UserCounts {
    records
        .iter()
        .filter(|record| record.is_object())
        .fold(UserCounts::default(), |mut counts, record| {
            counts.total += 1;
            if field_is(record, "role", ADMIN_ROLE) {
                counts.admins += 1;
            }
            if flag(record, "is_verified") {
                counts.verified += 1;
            }
            counts
        })
}
