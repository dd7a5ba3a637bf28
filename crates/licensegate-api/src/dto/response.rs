//! Response DTOs.

use serde::{Deserialize, Serialize};

use licensegate_entity::LicenseStatus;

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Liveness plus dependency status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// `"connected"` or `"unavailable"`.
    pub store: String,
}

/// Successful license validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateLicenseResponse {
    /// Always `true`.
    pub ok: bool,
    /// Current quota status.
    pub license: LicenseStatus,
}

/// Metered generation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text.
    pub reply: String,
}
