//! License registry: issuance, admin updates, lookups, and default seeding.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use licensegate_core::config::{LicenseConfig, SeedLicense};
use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;
use licensegate_core::traits::Clock;
use licensegate_core::types::LicenseId;
use licensegate_database::LedgerStore;
use licensegate_entity::{License, LicenseChanges, NewLicense};

/// Number of random bytes in a generated key.
const GENERATED_KEY_BYTES: usize = 16;

/// Request to issue a new license.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLicense {
    /// Explicit key. Blank means generate one.
    pub key: Option<String>,
    /// Lifetime ceiling. Defaults to the configured limit.
    pub limit: Option<i64>,
    /// Initial active flag. Defaults to `true`.
    pub active: Option<bool>,
}

/// Owns the admin-facing lifecycle of licenses.
#[derive(Debug, Clone)]
pub struct LicenseRegistry {
    /// Ledger store.
    store: Arc<dyn LedgerStore>,
    /// Timestamp source.
    clock: Arc<dyn Clock>,
    /// Key prefix and defaults.
    config: LicenseConfig,
}

impl LicenseRegistry {
    /// Creates a new license registry.
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>, config: LicenseConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Issues a new license.
    ///
    /// A duplicate key, explicit or generated, fails with `DuplicateKey`
    /// and leaves the existing record untouched.
    pub async fn create_license(&self, request: CreateLicense) -> AppResult<License> {
        let limit = request.limit.unwrap_or(self.config.default_limit);
        if limit < 0 {
            return Err(AppError::invalid_input(
                "Limit must be a non-negative integer",
            ));
        }

        let key = match request.key.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => self.generate_key(),
        };

        let new = NewLicense {
            id: LicenseId::new(),
            key,
            active: request.active.unwrap_or(true),
            limit,
            created_at: self.clock.now(),
        };

        let license = self.store.insert_license(new).await?;

        info!(
            license_id = %license.id,
            limit = license.limit,
            active = license.active,
            "License created"
        );

        Ok(license)
    }

    /// Applies a partial update to the license identified by `key`.
    ///
    /// `updated_at` advances even when `changes` is empty. Usage is never
    /// touched. A limit below the current usage fails with `InvalidInput`
    /// and leaves the license unchanged.
    pub async fn update_license(&self, key: &str, changes: LicenseChanges) -> AppResult<License> {
        if changes.limit.is_some_and(|limit| limit < 0) {
            return Err(AppError::invalid_input(
                "Limit must be a non-negative integer",
            ));
        }

        let existing = self
            .store
            .find_license_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))?;

        if changes.is_empty() {
            debug!(license_id = %existing.id, "Update carries no changes, touching updated_at only");
        }

        let updated = self
            .store
            .update_license(existing.id, changes, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))?;

        info!(
            license_id = %updated.id,
            limit = updated.limit,
            active = updated.active,
            "License updated"
        );

        Ok(updated)
    }

    /// Looks up a license by key.
    pub async fn get_by_key(&self, key: &str) -> AppResult<Option<License>> {
        self.store.find_license_by_key(key).await
    }

    /// Looks up a license by ID.
    pub async fn get_by_id(&self, id: LicenseId) -> AppResult<Option<License>> {
        self.store.find_license_by_id(id).await
    }

    /// Lists every license, most recently created first.
    pub async fn list_all(&self) -> AppResult<Vec<License>> {
        self.store.list_licenses().await
    }

    /// Inserts each seed whose key does not exist yet.
    ///
    /// Existing records, including operator changes to them, are left
    /// alone. Returns the number of licenses inserted.
    pub async fn seed_defaults(&self, seeds: &[SeedLicense]) -> AppResult<usize> {
        let mut inserted = 0;

        for seed in seeds {
            let key = seed.key.trim();
            if key.is_empty() || seed.limit < 0 {
                warn!(key = %seed.key, limit = seed.limit, "Skipping invalid seed license");
                continue;
            }

            let new = NewLicense {
                id: LicenseId::new(),
                key: key.to_string(),
                active: seed.active,
                limit: seed.limit,
                created_at: self.clock.now(),
            };

            if self.store.insert_license_if_absent(new).await? {
                inserted += 1;
            } else {
                debug!(key = %key, "Seed license already present");
            }
        }

        info!(inserted, total = seeds.len(), "Default licenses seeded");
        Ok(inserted)
    }

    /// Generates `"{prefix}-{32 hex chars}"` from a CSPRNG.
    fn generate_key(&self) -> String {
        let mut bytes = [0u8; GENERATED_KEY_BYTES];
        rand::rng().fill(&mut bytes);
        format!("{}-{}", self.config.key_prefix, hex::encode(&bytes))
    }
}

/// Lower-case hex encoding.
mod hex {
    /// Encode bytes to hex string.
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
