// ==============
// crates/portal-lib/src/metrics.rs

//! Central place for metric keys
pub const API_REQUEST: &str = "api.request";
pub const API_FAILURE: &str = "api.failure";
pub const SESSION_SAVED: &str = "session.saved";
pub const SESSION_CLEARED: &str = "session.cleared";
pub const GUARD_REDIRECT: &str = "guard.redirect";
