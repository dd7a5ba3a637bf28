//! Metered text generation handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use tracing::info;
use validator::Validate;

use licensegate_core::error::AppError;
use licensegate_service::GenerationRequest;

use crate::dto::request::GenerateRequest;
use crate::dto::response::GenerateResponse;
use crate::error::ApiError;
use crate::extractors::{JsonBody, LicenseKey};
use crate::state::AppState;

/// Endpoint name recorded on usage events.
pub const GENERATE_ENDPOINT: &str = "/api/generate";

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    LicenseKey(key): LicenseKey,
    JsonBody(req): JsonBody<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    req.validate()
        .map_err(|e| AppError::invalid_input(e.to_string()))?;

    let request = GenerationRequest::from(req);
    let generator = Arc::clone(&state.generator);

    let (reply, license) = state
        .enforcer
        .run_metered(&key, GENERATE_ENDPOINT, move |_| async move {
            generator.generate(&request).await
        })
        .await?;

    info!(
        license_id = %license.id,
        usage = license.usage,
        remaining = license.remaining(),
        "Generation served"
    );

    Ok(Json(GenerateResponse { reply }))
}
