//! Route definitions for the LicenseGate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request logging.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(license_routes())
        .merge(generate_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Caller-facing license validation
fn license_routes() -> Router<AppState> {
    Router::new().route("/license/validate", post(handlers::license::validate))
}

/// Metered generation
fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate", post(handlers::generate::generate))
}

/// License administration, loopback peers only
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/license/create",
            post(handlers::admin::license::create_license),
        )
        .route(
            "/admin/license/update",
            post(handlers::admin::license::update_license),
        )
        .route(
            "/admin/licenses",
            get(handlers::admin::license::list_licenses),
        )
        .route(
            "/admin/dashboard",
            get(handlers::admin::dashboard::dashboard),
        )
        .route_layer(axum_middleware::from_fn(middleware::local_only::local_only))
}
