//! # licensegate-api
//!
//! HTTP API layer for LicenseGate built on Axum.
//!
//! Provides the license validation, metered generation, admin, and health
//! endpoints, along with middleware (loopback guard, CORS, logging),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiErrorResponse};
pub use state::AppState;
