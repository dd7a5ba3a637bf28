//! # licensegate-service
//!
//! Business logic for LicenseGate: the license registry, the quota
//! enforcer, usage reporting, and the text-generation seam.
//!
//! Services follow constructor injection. The ledger store and clock are
//! provided at construction time via `Arc` references.

pub mod enforcer;
pub mod generation;
pub mod registry;
pub mod reporter;

pub use enforcer::{LicenseValidation, QuotaEnforcer};
pub use generation::{GenerationRequest, OpenAiGenerator, TextGenerator};
pub use registry::{CreateLicense, LicenseRegistry};
pub use reporter::{DashboardStats, ServerStats, UsageReporter};
