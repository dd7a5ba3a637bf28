//! Repository implementations for LicenseGate entities.

pub mod license;
pub mod usage;

pub use license::LicenseRepository;
pub use usage::UsageEventRepository;
