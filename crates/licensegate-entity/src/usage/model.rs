//! Usage event entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use licensegate_core::types::{LicenseId, UsageEventId};

/// An append-only record of one committed unit of quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageEvent {
    /// Unique event identifier.
    pub id: UsageEventId,
    /// The license that was charged.
    pub license_id: LicenseId,
    /// Operation that consumed the unit (e.g. `"/api/generate"`).
    pub endpoint: String,
    /// Commit time. Equal to the license's `last_request_at` at commit.
    pub created_at: DateTime<Utc>,
}

/// Aggregated counts over all usage events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Number of events ever recorded.
    pub total_requests: i64,
    /// Event count per license key. Keys with no events are absent.
    pub requests_per_key: BTreeMap<String, i64>,
    /// Events at or after the requested cut-off.
    pub requests_since: i64,
    /// Newest event timestamp.
    pub last_activity: Option<DateTime<Utc>>,
}
