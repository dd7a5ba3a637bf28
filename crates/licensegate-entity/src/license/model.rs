//! License entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use licensegate_core::types::LicenseId;

/// A credential record granting a bounded number of generation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct License {
    /// Unique, immutable identifier.
    pub id: LicenseId,
    /// Caller-facing opaque credential. Case-sensitive and immutable.
    #[sqlx(rename = "license_key")]
    pub key: String,
    /// When false, every generation request is rejected.
    pub active: bool,
    /// Lifetime usage ceiling.
    #[sqlx(rename = "limit_total")]
    pub limit: i64,
    /// Committed generations so far. Never exceeds `limit`.
    pub usage: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the latest mutation.
    pub updated_at: DateTime<Utc>,
    /// Time of the latest committed usage increment.
    pub last_request_at: Option<DateTime<Utc>>,
}

impl License {
    /// Units of quota still available.
    pub fn remaining(&self) -> i64 {
        (self.limit - self.usage).max(0)
    }

    /// Whether the advisory pre-check would refuse a new request.
    pub fn is_exhausted(&self) -> bool {
        self.usage >= self.limit
    }
}

/// Data required to insert a new license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLicense {
    /// Identifier to assign.
    pub id: LicenseId,
    /// License key.
    pub key: String,
    /// Initial active flag.
    pub active: bool,
    /// Lifetime usage ceiling.
    pub limit: i64,
    /// Creation time, also used as the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

/// Partial update of the admin-controlled license attributes.
///
/// `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseChanges {
    /// New lifetime ceiling.
    pub limit: Option<i64>,
    /// New active flag.
    pub active: Option<bool>,
}

impl LicenseChanges {
    /// Whether no attribute is being changed.
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.active.is_none()
    }
}
