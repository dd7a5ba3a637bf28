//! Derived license views returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::License;

/// Quota status reported by license validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    /// Whether the license is active.
    pub active: bool,
    /// Lifetime ceiling.
    pub limit: i64,
    /// Committed usage.
    pub usage: i64,
    /// Units left.
    pub remaining: i64,
}

impl From<&License> for LicenseStatus {
    fn from(license: &License) -> Self {
        Self {
            active: license.active,
            limit: license.limit,
            usage: license.usage,
            remaining: license.remaining(),
        }
    }
}

/// Admin listing shape of a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    /// License key.
    pub key: String,
    /// Whether the license is active.
    pub active: bool,
    /// Lifetime ceiling.
    pub limit: i64,
    /// Committed usage.
    pub usage: i64,
    /// Units left.
    pub remaining: i64,
    /// Latest committed request.
    pub last_request_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&License> for LicenseSummary {
    fn from(license: &License) -> Self {
        Self {
            key: license.key.clone(),
            active: license.active,
            limit: license.limit,
            usage: license.usage,
            remaining: license.remaining(),
            last_request_at: license.last_request_at,
            created_at: license.created_at,
        }
    }
}

impl From<License> for LicenseSummary {
    fn from(license: License) -> Self {
        Self::from(&license)
    }
}
