//! License domain entities.

pub mod input;
pub mod model;
pub mod status;

pub use input::{parse_active, parse_limit, parse_optional};
pub use model::{License, LicenseChanges, NewLicense};
pub use status::{LicenseStatus, LicenseSummary};
