//! License administration handlers.

use axum::Json;
use axum::extract::State;

use licensegate_core::error::AppError;
use licensegate_entity::license::{parse_active, parse_limit, parse_optional};
use licensegate_entity::{LicenseChanges, LicenseSummary};
use licensegate_service::CreateLicense;

use crate::dto::request::{CreateLicenseRequest, UpdateLicenseRequest};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// POST /api/admin/license/create
pub async fn create_license(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateLicenseRequest>,
) -> Result<Json<LicenseSummary>, ApiError> {
    let request = CreateLicense {
        key: req.key,
        limit: parse_optional(req.limit.as_ref(), parse_limit)?,
        active: parse_optional(req.active.as_ref(), parse_active)?,
    };

    let license = state.registry.create_license(request).await?;
    Ok(Json(LicenseSummary::from(license)))
}

/// POST /api/admin/license/update
pub async fn update_license(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateLicenseRequest>,
) -> Result<Json<LicenseSummary>, ApiError> {
    let key = req
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::invalid_input("License key required"))?;

    let changes = LicenseChanges {
        limit: parse_optional(req.limit.as_ref(), parse_limit)?,
        active: parse_optional(req.active.as_ref(), parse_active)?,
    };

    let license = state.registry.update_license(&key, changes).await?;
    Ok(Json(LicenseSummary::from(license)))
}

/// GET /api/admin/licenses
pub async fn list_licenses(
    State(state): State<AppState>,
) -> Result<Json<Vec<LicenseSummary>>, ApiError> {
    let licenses = state.registry.list_all().await?;
    Ok(Json(licenses.into_iter().map(LicenseSummary::from).collect()))
}
