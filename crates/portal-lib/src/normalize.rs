// ============================
// portal-lib/src/normalize.rs
// ============================
//! Extraction of the record array from a list endpoint's payload.
//!
//! Backends have wrapped list responses in several ways over time. The
//! rules below are tried in order and the first match wins, even if a
//! later rule would also match:
//!
//! 1. the payload is itself an array
//! 2. `payload.results` is an array
//! 3. `payload.data` is an array
//! 4. `payload[domain_key]` is an array (when a domain key is given)
//!
//! Anything else, `null` included, normalizes to an empty list.
use serde_json::Value;

/// One extraction rule: look at the payload, maybe return the records.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub name: &'static str,
    extract: for<'a> fn(&'a Value, Option<&str>) -> Option<&'a Vec<Value>>,
}

impl ExtractionRule {
    pub fn apply<'a>(&self, payload: &'a Value, domain_key: Option<&str>) -> Option<&'a Vec<Value>> {
        (self.extract)(payload, domain_key)
    }
}

/// Extraction rules in precedence order
pub const RULES: [ExtractionRule; 4] = [
    ExtractionRule {
        name: "bare-array",
        extract: |payload, _| payload.as_array(),
    },
    ExtractionRule {
        name: "results",
        extract: |payload, _| payload.get("results").and_then(Value::as_array),
    },
    ExtractionRule {
        name: "data",
        extract: |payload, _| payload.get("data").and_then(Value::as_array),
    },
    ExtractionRule {
        name: "domain-key",
        extract: |payload, key| key.and_then(|k| payload.get(k)).and_then(Value::as_array),
    },
];

/// Name of the rule that would be used for `payload`, if any
pub fn matching_rule(payload: &Value, domain_key: Option<&str>) -> Option<&'static str> {
    RULES
        .iter()
        .find(|rule| rule.apply(payload, domain_key).is_some())
        .map(|rule| rule.name)
}

/// Records of a list payload, never failing
pub fn normalize_list(payload: &Value, domain_key: Option<&str>) -> Vec<Value> {
    RULES
        .iter()
        .find_map(|rule| rule.apply(payload, domain_key))
        .cloned()
        .unwrap_or_default()
}

/// Owned variant that moves the records out instead of cloning them
pub fn into_list(payload: Value, domain_key: Option<&str>) -> Vec<Value> {
    // rule names double as the key they read, except the two below
    let key = match matching_rule(&payload, domain_key) {
        None => return Vec::new(),
        Some("bare-array") => None,
        Some("domain-key") => domain_key,
        Some(name) => Some(name),
    };
    match (payload, key) {
        (Value::Array(items), None) => items,
        (Value::Object(mut map), Some(key)) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
