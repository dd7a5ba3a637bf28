//! Caller-facing license handlers.

use axum::Json;
use axum::extract::State;

use licensegate_core::error::AppError;
use licensegate_service::LicenseValidation;

use crate::dto::request::ValidateLicenseRequest;
use crate::dto::response::ValidateLicenseResponse;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /api/license/validate
pub async fn validate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ValidateLicenseRequest>,
) -> Result<Json<ValidateLicenseResponse>, ApiError> {
    let key = req
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::invalid_input("License key required"))?;

    match state.enforcer.validate(&key).await? {
        LicenseValidation::Valid(license) => Ok(Json(ValidateLicenseResponse {
            ok: true,
            license,
        })),
        LicenseValidation::Rejected { kind, message, .. } => {
            Err(AppError::new(kind, message).into())
        }
    }
}
