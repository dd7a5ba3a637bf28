//! Custom Axum extractors.

pub mod json;
pub mod license_key;

pub use json::JsonBody;
pub use license_key::{LICENSE_KEY_HEADER, LicenseKey};
