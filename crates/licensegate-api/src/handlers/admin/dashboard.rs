//! Admin dashboard handler.

use axum::Json;
use axum::extract::State;

use licensegate_service::DashboardStats;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.reporter.dashboard_stats().await?))
}
