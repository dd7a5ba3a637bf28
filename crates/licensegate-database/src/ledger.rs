//! SQL-backed ledger store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use licensegate_core::error::{AppError, ErrorKind};
use licensegate_core::result::AppResult;
use licensegate_core::types::{LicenseId, UsageEventId};
use licensegate_entity::{License, LicenseChanges, NewLicense, UsageEvent, UsageTotals};

use crate::connection::DatabasePool;
use crate::repositories::{LicenseRepository, UsageEventRepository};
use crate::store::{LedgerStore, UsageCommit};

/// Ledger store persisting to SQLite through sqlx.
#[derive(Debug, Clone)]
pub struct SqlLedgerStore {
    db: DatabasePool,
    licenses: LicenseRepository,
    usage_events: UsageEventRepository,
}

impl SqlLedgerStore {
    /// Create a store over an already migrated pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            licenses: LicenseRepository::new(pool.clone()),
            usage_events: UsageEventRepository::new(pool),
            db,
        }
    }

    /// The pool this store writes to.
    pub fn database(&self) -> &DatabasePool {
        &self.db
    }
}

#[async_trait]
impl LedgerStore for SqlLedgerStore {
    async fn find_license_by_key(&self, key: &str) -> AppResult<Option<License>> {
        self.licenses.find_by_key(key).await
    }

    async fn find_license_by_id(&self, id: LicenseId) -> AppResult<Option<License>> {
        self.licenses.find_by_id(id).await
    }

    async fn insert_license(&self, new: NewLicense) -> AppResult<License> {
        self.licenses.create(&new).await
    }

    async fn insert_license_if_absent(&self, new: NewLicense) -> AppResult<bool> {
        self.licenses.create_if_absent(&new).await
    }

    async fn update_license(
        &self,
        id: LicenseId,
        changes: LicenseChanges,
        at: DateTime<Utc>,
    ) -> AppResult<Option<License>> {
        self.licenses.update(id, changes, at).await
    }

    async fn list_licenses(&self) -> AppResult<Vec<License>> {
        self.licenses.find_all().await
    }

    async fn record_usage(
        &self,
        license_id: LicenseId,
        endpoint: &str,
        at: DateTime<Utc>,
    ) -> AppResult<UsageCommit> {
        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to begin usage transaction", e)
        })?;

        let Some(license) = LicenseRepository::increment_usage(&mut tx, license_id, at).await?
        else {
            let known = LicenseRepository::exists(&mut tx, license_id).await?;
            // Dropping the transaction rolls it back; nothing was written.
            drop(tx);
            debug!(license_id = %license_id, known, "Usage increment refused");
            return Ok(if known {
                UsageCommit::LimitReached
            } else {
                UsageCommit::UnknownLicense
            });
        };

        let event = UsageEvent {
            id: UsageEventId::new(),
            license_id,
            endpoint: endpoint.to_string(),
            created_at: at,
        };
        UsageEventRepository::create(&mut tx, &event).await?;

        tx.commit().await.map_err(|e| {
            error!(license_id = %license_id, error = %e, "Usage commit failed");
            AppError::with_source(ErrorKind::Storage, "Failed to commit usage transaction", e)
        })?;

        Ok(UsageCommit::Committed { license, event })
    }

    async fn usage_totals(&self, since: DateTime<Utc>) -> AppResult<UsageTotals> {
        self.usage_events.totals(since).await
    }

    async fn usage_events_for(&self, license_id: LicenseId) -> AppResult<Vec<UsageEvent>> {
        self.usage_events.find_by_license(license_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
