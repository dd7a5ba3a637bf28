//! The ledger store seam shared by every service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;
use licensegate_core::types::LicenseId;
use licensegate_entity::{License, LicenseChanges, NewLicense, UsageEvent, UsageTotals};

/// Outcome of an attempt to commit one unit of usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageCommit {
    /// The increment and its usage event were both written.
    Committed {
        /// License state after the increment.
        license: License,
        /// The event written alongside the increment.
        event: UsageEvent,
    },
    /// The license had no remaining quota at commit time. Nothing was written.
    LimitReached,
    /// No license with the given id exists. Nothing was written.
    UnknownLicense,
}

/// Durable storage for licenses and usage events.
///
/// Implementations must make [`LedgerStore::record_usage`] atomic: the
/// conditional increment and the event insert are either both visible
/// or neither is, and two concurrent commits can never push `usage`
/// past `limit`. Two implementations are provided:
/// - SQL-backed (`SqlLedgerStore`, one transaction per commit)
/// - In-memory (`MemoryLedgerStore`, using `tokio::sync::Mutex`)
#[async_trait]
pub trait LedgerStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a license by its key.
    async fn find_license_by_key(&self, key: &str) -> AppResult<Option<License>>;

    /// Find a license by its id.
    async fn find_license_by_id(&self, id: LicenseId) -> AppResult<Option<License>>;

    /// Insert a license. Fails with `DuplicateKey` when the key is taken.
    async fn insert_license(&self, new: NewLicense) -> AppResult<License>;

    /// Insert a license unless its key is taken.
    ///
    /// Returns `true` if a row was inserted.
    async fn insert_license_if_absent(&self, new: NewLicense) -> AppResult<bool>;

    /// Apply a partial update and set `updated_at` to `at`.
    ///
    /// Never touches `usage`. Returns `None` when the id is unknown. A new
    /// limit below the current usage is refused with `InvalidInput` and
    /// nothing is written.
    async fn update_license(
        &self,
        id: LicenseId,
        changes: LicenseChanges,
        at: DateTime<Utc>,
    ) -> AppResult<Option<License>>;

    /// List all licenses, most recently created first.
    async fn list_licenses(&self) -> AppResult<Vec<License>>;

    /// Atomically increment usage if below the limit and append a usage event.
    async fn record_usage(
        &self,
        license_id: LicenseId,
        endpoint: &str,
        at: DateTime<Utc>,
    ) -> AppResult<UsageCommit>;

    /// Aggregate all usage events, counting those at or after `since`.
    async fn usage_totals(&self, since: DateTime<Utc>) -> AppResult<UsageTotals>;

    /// Usage events of one license, newest first.
    async fn usage_events_for(&self, license_id: LicenseId) -> AppResult<Vec<UsageEvent>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Error for an update that would leave `usage` above `limit`.
pub(crate) fn limit_below_usage(limit: i64, usage: i64) -> AppError {
    AppError::invalid_input(format!(
        "Limit {limit} is below the current usage of {usage}"
    ))
}
