// ============================
// portal-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod logout;
pub mod session;
pub mod token_store;
mod service;
mod service_impl;

pub use logout::LogoutFlow;
pub use service::{AuthService, RegisterOutcome};
pub use service_impl::DefaultAuth;
pub use session::{display_name, is_admin_record, SessionOracle};
pub use token_store::{StoredSession, TokenStore};
