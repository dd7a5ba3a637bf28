//! Usage event repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use licensegate_core::error::{AppError, ErrorKind};
use licensegate_core::result::AppResult;
use licensegate_core::types::LicenseId;
use licensegate_entity::{UsageEvent, UsageTotals};

/// Repository for the append-only usage trail.
#[derive(Debug, Clone)]
pub struct UsageEventRepository {
    pool: SqlitePool,
}

impl UsageEventRepository {
    /// Create a new usage event repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an event inside an open transaction.
    pub async fn create(conn: &mut SqliteConnection, event: &UsageEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO usage_events (id, license_id, endpoint, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(event.id)
        .bind(event.license_id)
        .bind(&event.endpoint)
        .bind(event.created_at)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to record usage event", e))?;
        Ok(())
    }

    /// Events of one license, newest first.
    pub async fn find_by_license(&self, license_id: LicenseId) -> AppResult<Vec<UsageEvent>> {
        sqlx::query_as::<_, UsageEvent>(
            "SELECT * FROM usage_events WHERE license_id = ?1 ORDER BY created_at DESC, id DESC",
        )
        .bind(license_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to list usage events", e))
    }

    /// Aggregate counts over all events.
    pub async fn totals(&self, since: DateTime<Utc>) -> AppResult<UsageTotals> {
        let map_err = |e: sqlx::Error| {
            AppError::with_source(ErrorKind::Storage, "Failed to aggregate usage events", e)
        };

        let total_requests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usage_events")
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)?;

        let requests_since: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM usage_events WHERE created_at >= ?1")
                .bind(since)
                .fetch_one(&self.pool)
                .await
                .map_err(map_err)?;

        let last_activity: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(created_at) FROM usage_events")
                .fetch_one(&self.pool)
                .await
                .map_err(map_err)?;

        let per_key: Vec<(String, i64)> = sqlx::query_as(
            "SELECT l.license_key, COUNT(*) FROM usage_events e \
             JOIN licenses l ON l.id = e.license_id \
             GROUP BY l.license_key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(UsageTotals {
            total_requests,
            requests_per_key: per_key.into_iter().collect(),
            requests_since,
            last_activity,
        })
    }
}
