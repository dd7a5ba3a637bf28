//! In-memory ledger store using a Tokio mutex for single-node deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;
use licensegate_core::types::{LicenseId, UsageEventId};
use licensegate_entity::{License, LicenseChanges, NewLicense, UsageEvent, UsageTotals};

use crate::store::{LedgerStore, UsageCommit, limit_below_usage};

/// Internal state for the memory-based ledger.
#[derive(Debug, Default)]
struct InnerState {
    /// Licenses by id.
    licenses: HashMap<LicenseId, License>,
    /// Key to id index.
    keys: HashMap<String, LicenseId>,
    /// Append-only usage trail, in commit order.
    events: Vec<UsageEvent>,
}

impl InnerState {
    fn insert(&mut self, new: NewLicense) -> License {
        let license = License {
            id: new.id,
            key: new.key,
            active: new.active,
            limit: new.limit,
            usage: 0,
            created_at: new.created_at,
            updated_at: new.created_at,
            last_request_at: None,
        };
        self.keys.insert(license.key.clone(), license.id);
        self.licenses.insert(license.id, license.clone());
        license
    }
}

/// In-memory ledger store.
///
/// Contents are lost on drop. Suitable for tests and single-node
/// throwaway deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryLedgerStore {
    /// Creates an empty memory-based ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn find_license_by_key(&self, key: &str) -> AppResult<Option<License>> {
        let state = self.state.lock().await;
        Ok(state
            .keys
            .get(key)
            .and_then(|id| state.licenses.get(id))
            .cloned())
    }

    async fn find_license_by_id(&self, id: LicenseId) -> AppResult<Option<License>> {
        let state = self.state.lock().await;
        Ok(state.licenses.get(&id).cloned())
    }

    async fn insert_license(&self, new: NewLicense) -> AppResult<License> {
        let mut state = self.state.lock().await;
        if state.keys.contains_key(&new.key) {
            return Err(AppError::duplicate_key(format!(
                "License key '{}' already exists",
                new.key
            )));
        }
        Ok(state.insert(new))
    }

    async fn insert_license_if_absent(&self, new: NewLicense) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state.keys.contains_key(&new.key) {
            return Ok(false);
        }
        state.insert(new);
        Ok(true)
    }

    async fn update_license(
        &self,
        id: LicenseId,
        changes: LicenseChanges,
        at: DateTime<Utc>,
    ) -> AppResult<Option<License>> {
        let mut state = self.state.lock().await;
        let Some(license) = state.licenses.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(limit) = changes.limit {
            if limit < license.usage {
                return Err(limit_below_usage(limit, license.usage));
            }
            license.limit = limit;
        }
        if let Some(active) = changes.active {
            license.active = active;
        }
        license.updated_at = at;
        Ok(Some(license.clone()))
    }

    async fn list_licenses(&self) -> AppResult<Vec<License>> {
        let state = self.state.lock().await;
        let mut licenses: Vec<License> = state.licenses.values().cloned().collect();
        licenses.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(licenses)
    }

    async fn record_usage(
        &self,
        license_id: LicenseId,
        endpoint: &str,
        at: DateTime<Utc>,
    ) -> AppResult<UsageCommit> {
        let mut state = self.state.lock().await;

        let Some(license) = state.licenses.get_mut(&license_id) else {
            return Ok(UsageCommit::UnknownLicense);
        };
        if license.usage >= license.limit {
            debug!(license_id = %license_id, usage = license.usage, "Usage increment refused");
            return Ok(UsageCommit::LimitReached);
        }

        license.usage += 1;
        license.updated_at = at;
        license.last_request_at = Some(at);
        let license = license.clone();

        let event = UsageEvent {
            id: UsageEventId::new(),
            license_id,
            endpoint: endpoint.to_string(),
            created_at: at,
        };
        state.events.push(event.clone());

        Ok(UsageCommit::Committed { license, event })
    }

    async fn usage_totals(&self, since: DateTime<Utc>) -> AppResult<UsageTotals> {
        let state = self.state.lock().await;

        let mut requests_per_key: BTreeMap<String, i64> = BTreeMap::new();
        let mut requests_since = 0;
        let mut last_activity: Option<DateTime<Utc>> = None;

        for event in &state.events {
            if let Some(license) = state.licenses.get(&event.license_id) {
                *requests_per_key.entry(license.key.clone()).or_insert(0) += 1;
            }
            if event.created_at >= since {
                requests_since += 1;
            }
            last_activity = last_activity.max(Some(event.created_at));
        }

        Ok(UsageTotals {
            total_requests: state.events.len() as i64,
            requests_per_key,
            requests_since,
            last_activity,
        })
    }

    async fn usage_events_for(&self, license_id: LicenseId) -> AppResult<Vec<UsageEvent>> {
        let state = self.state.lock().await;
        Ok(state
            .events
            .iter()
            .rev()
            .filter(|e| e.license_id == license_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
