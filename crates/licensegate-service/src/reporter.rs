//! Usage reporting for the admin dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;
use licensegate_database::LedgerStore;
use licensegate_entity::{LicenseSummary, UsageEvent};

/// Request counters derived from the usage trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    /// All usage events ever recorded.
    pub total_requests: i64,
    /// Event count per license key. Keys without events are absent.
    pub requests_per_key: BTreeMap<String, i64>,
    /// Events since local midnight.
    pub requests_today: i64,
    /// Newest event timestamp.
    pub last_activity: Option<DateTime<Utc>>,
}

/// Admin dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of licenses.
    pub total_keys: usize,
    /// Number of active licenses.
    pub active_keys: usize,
    /// Number of inactive licenses.
    pub inactive_keys: usize,
    /// Every license, most recently created first.
    pub keys: Vec<LicenseSummary>,
    /// Request counters.
    pub server_stats: ServerStats,
}

/// Read-only aggregation over licenses and usage events.
#[derive(Debug, Clone)]
pub struct UsageReporter {
    /// Ledger store.
    store: Arc<dyn LedgerStore>,
}

impl UsageReporter {
    /// Creates a new usage reporter.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Computes the dashboard snapshot. Nothing is cached.
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let licenses = self.store.list_licenses().await?;
        let totals = self.store.usage_totals(start_of_local_day()).await?;

        let active_keys = licenses.iter().filter(|l| l.active).count();

        Ok(DashboardStats {
            total_keys: licenses.len(),
            active_keys,
            inactive_keys: licenses.len() - active_keys,
            keys: licenses.into_iter().map(LicenseSummary::from).collect(),
            server_stats: ServerStats {
                total_requests: totals.total_requests,
                requests_per_key: totals.requests_per_key,
                requests_today: totals.requests_since,
                last_activity: totals.last_activity,
            },
        })
    }

    /// Usage trail of one license, newest first.
    pub async fn license_usage(&self, key: &str) -> AppResult<Vec<UsageEvent>> {
        let license = self
            .store
            .find_license_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))?;
        self.store.usage_events_for(license.id).await
    }
}

/// Local midnight of the current day, in UTC.
///
/// When midnight falls into a DST gap the earliest valid local instant
/// of the day is used.
pub fn start_of_local_day() -> DateTime<Utc> {
    let now = Local::now();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight does not exist locally; step forward to the first hour that does.
        None => (1..=3)
            .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .find_map(|t| {
                now.date_naive()
                    .and_time(t)
                    .and_local_timezone(Local)
                    .earliest()
            })
            .map_or_else(|| now.with_timezone(&Utc), |start| start.with_timezone(&Utc)),
    }
}
