//! Route handlers organized by domain.

pub mod admin;
pub mod generate;
pub mod health;
pub mod license;
