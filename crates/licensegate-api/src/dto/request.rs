//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use licensegate_service::GenerationRequest;

/// License validation request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateLicenseRequest {
    /// License key to check.
    #[serde(default)]
    pub key: Option<String>,
}

/// Metered generation request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Prompt forwarded to the backend.
    #[validate(length(max = 8000, message = "Prompt is too long"))]
    #[serde(default)]
    pub prompt: String,
    /// Requested reply length in characters.
    #[serde(default)]
    pub max_chars: Option<f64>,
    /// Sampling temperature.
    #[validate(range(min = 0.0, max = 2.0, message = "Temperature must be between 0 and 2"))]
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl From<GenerateRequest> for GenerationRequest {
    fn from(req: GenerateRequest) -> Self {
        Self {
            prompt: req.prompt,
            max_chars: req.max_chars,
            temperature: req.temperature,
        }
    }
}

/// Admin license creation body.
///
/// `limit` and `active` stay loosely typed here and go through the shared
/// field parsers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLicenseRequest {
    /// Explicit key. Omitted or blank means generate one.
    #[serde(default)]
    pub key: Option<String>,
    /// Lifetime ceiling.
    #[serde(default)]
    pub limit: Option<Value>,
    /// Initial active flag.
    #[serde(default)]
    pub active: Option<Value>,
}

/// Admin license update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLicenseRequest {
    /// Key of the license to change.
    #[serde(default)]
    pub key: Option<String>,
    /// New lifetime ceiling.
    #[serde(default)]
    pub limit: Option<Value>,
    /// New active flag.
    #[serde(default)]
    pub active: Option<Value>,
}
