//! `LicenseKey` extractor: pulls the caller's key from the `x-license-key` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use licensegate_core::error::AppError;

use crate::error::ApiError;

/// Header carrying the caller's license key.
pub const LICENSE_KEY_HEADER: &str = "x-license-key";

/// The raw license key presented by the caller.
///
/// Only presence is checked here. Resolution and quota checks belong to
/// the quota enforcer.
#[derive(Debug, Clone)]
pub struct LicenseKey(pub String);

impl std::ops::Deref for LicenseKey {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for LicenseKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(LICENSE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::invalid_key("License key missing"))?;

        Ok(LicenseKey(key.to_string()))
    }
}
