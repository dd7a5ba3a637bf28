//! Admin-only handlers. Mounted behind the loopback guard.

pub mod dashboard;
pub mod license;
