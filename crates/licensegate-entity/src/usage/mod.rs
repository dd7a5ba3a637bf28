//! Usage event entities and aggregates.

pub mod model;

pub use model::{UsageEvent, UsageTotals};
