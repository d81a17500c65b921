//! HTTP access to the remote API.

pub mod client;
pub mod form;

pub use client::{ApiClient, ApiRequest, RequestBody};
pub use form::{FormField, FormValue, MultipartForm};
