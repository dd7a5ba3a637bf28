//! License repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use licensegate_core::error::{AppError, ErrorKind};
use licensegate_core::result::AppResult;
use licensegate_core::types::LicenseId;
use licensegate_entity::{License, LicenseChanges, NewLicense};

use crate::store::limit_below_usage;

/// Repository for license records.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: SqlitePool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a license by ID.
    pub async fn find_by_id(&self, id: LicenseId) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find license", e))
    }

    /// Find a license by key. Keys compare case-sensitively.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE license_key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to find license by key", e)
            })
    }

    /// List all licenses, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to list licenses", e))
    }

    /// Insert a new license.
    pub async fn create(&self, new: &NewLicense) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (id, license_key, active, limit_total, usage, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5) RETURNING *",
        )
        .bind(new.id)
        .bind(&new.key)
        .bind(new.active)
        .bind(new.limit)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::with_source(
                ErrorKind::DuplicateKey,
                format!("License key '{}' already exists", new.key),
                e,
            ),
            e => AppError::with_source(ErrorKind::Storage, "Failed to create license", e),
        })
    }

    /// Insert a license unless its key already exists.
    pub async fn create_if_absent(&self, new: &NewLicense) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO licenses (id, license_key, active, limit_total, usage, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        )
        .bind(new.id)
        .bind(&new.key)
        .bind(new.active)
        .bind(new.limit)
        .bind(new.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to seed license", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Update limit and/or active flag. `updated_at` is always refreshed.
    ///
    /// The new limit is compared with `usage` in the same statement, so a
    /// concurrent commit cannot slip in between. A limit below current
    /// usage fails with `InvalidInput` and leaves the row untouched.
    pub async fn update(
        &self,
        id: LicenseId,
        changes: LicenseChanges,
        at: DateTime<Utc>,
    ) -> AppResult<Option<License>> {
        let updated = sqlx::query_as::<_, License>(
            "UPDATE licenses SET \
                limit_total = COALESCE(?1, limit_total), \
                active = COALESCE(?2, active), \
                updated_at = ?3 \
             WHERE id = ?4 AND COALESCE(?1, limit_total) >= usage RETURNING *",
        )
        .bind(changes.limit)
        .bind(changes.active)
        .bind(at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to update license", e))?;

        if updated.is_some() {
            return Ok(updated);
        }

        // Rows are never deleted, so a miss on a known id means the guard refused.
        match self.find_by_id(id).await? {
            Some(current) => Err(limit_below_usage(
                changes.limit.unwrap_or(current.limit),
                current.usage,
            )),
            None => Ok(None),
        }
    }

    /// Conditionally consume one unit of quota inside an open transaction.
    ///
    /// Returns `None` when the license is unknown or already at its limit.
    pub async fn increment_usage(
        conn: &mut SqliteConnection,
        id: LicenseId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET usage = usage + 1, updated_at = ?1, last_request_at = ?1 \
             WHERE id = ?2 AND usage < limit_total RETURNING *",
        )
        .bind(at)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to increment usage", e))
    }

    /// Whether a license with this ID exists, inside an open transaction.
    pub async fn exists(conn: &mut SqliteConnection, id: LicenseId) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM licenses WHERE id = ?1")
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to check license", e)
            })?;
        Ok(count > 0)
    }
}
