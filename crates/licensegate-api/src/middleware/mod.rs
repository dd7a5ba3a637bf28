//! Axum middleware stack.

pub mod cors;
pub mod local_only;
pub mod logging;
