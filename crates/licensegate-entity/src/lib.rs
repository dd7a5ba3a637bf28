//! # licensegate-entity
//!
//! Domain entity models for LicenseGate. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod license;
pub mod usage;

pub use license::{
    License, LicenseChanges, LicenseStatus, LicenseSummary, NewLicense, parse_active, parse_limit,
    parse_optional,
};
pub use usage::{UsageEvent, UsageTotals};
