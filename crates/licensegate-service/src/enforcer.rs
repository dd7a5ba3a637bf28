//! Quota enforcement: the validate, reserve, commit protocol.
//!
//! Authorization is an optimistic pre-check against a fresh read of the
//! store. The conditional increment performed by
//! [`LedgerStore::record_usage`] is the only authority on whether a unit
//! of quota is actually consumed, so two callers that both pass the
//! pre-check for the last unit cannot both commit.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use licensegate_core::error::{AppError, ErrorKind};
use licensegate_core::result::AppResult;
use licensegate_core::traits::Clock;
use licensegate_core::types::LicenseId;
use licensegate_database::{LedgerStore, UsageCommit};
use licensegate_entity::{License, LicenseStatus};

/// Outcome of a read-only license check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LicenseValidation {
    /// The license can be used right now.
    Valid(LicenseStatus),
    /// The license cannot be used.
    Rejected {
        /// Why the license was rejected.
        kind: ErrorKind,
        /// HTTP status a routing layer should answer with.
        http_status_hint: u16,
        /// Human-readable reason.
        message: String,
    },
}

impl LicenseValidation {
    /// Whether the license passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl From<AppError> for LicenseValidation {
    fn from(err: AppError) -> Self {
        Self::Rejected {
            kind: err.kind,
            http_status_hint: err.http_status_hint(),
            message: err.message,
        }
    }
}

/// Gates and meters access to the paid capability.
#[derive(Debug, Clone)]
pub struct QuotaEnforcer {
    /// Ledger store.
    store: Arc<dyn LedgerStore>,
    /// Timestamp source for commits.
    clock: Arc<dyn Clock>,
}

impl QuotaEnforcer {
    /// Creates a new quota enforcer.
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reports whether `key` could be used now, without consuming quota.
    ///
    /// Storage failures are returned as errors rather than folded into
    /// a rejection.
    pub async fn validate(&self, key: &str) -> AppResult<LicenseValidation> {
        match self.authorize(key).await {
            Ok(license) => Ok(LicenseValidation::Valid(LicenseStatus::from(&license))),
            Err(err) if err.kind.is_expected() => Ok(LicenseValidation::from(err)),
            Err(err) => Err(err),
        }
    }

    /// Resolves `key` and runs the advisory pre-checks.
    ///
    /// Unknown keys fail with `InvalidKey`, inactive licenses with
    /// `Disabled`, and exhausted ones with `LimitExceeded`.
    pub async fn authorize(&self, key: &str) -> AppResult<License> {
        let license = self
            .store
            .find_license_by_key(key)
            .await?
            .ok_or_else(|| AppError::invalid_key("Invalid license key"))?;

        if !license.active {
            debug!(license_id = %license.id, "Rejected disabled license");
            return Err(AppError::disabled("License disabled"));
        }

        if license.is_exhausted() {
            debug!(
                license_id = %license.id,
                usage = license.usage,
                limit = license.limit,
                "Rejected exhausted license"
            );
            return Err(AppError::limit_exceeded("License limit exceeded"));
        }

        Ok(license)
    }

    /// Commits one unit of usage for an authorized license.
    ///
    /// Fails with `LimitExceeded` if the limit was reached after the
    /// pre-check. On any failure nothing is written.
    pub async fn record_usage(&self, license_id: LicenseId, endpoint: &str) -> AppResult<License> {
        let at = self.clock.now();

        let outcome = self
            .store
            .record_usage(license_id, endpoint, at)
            .await
            .inspect_err(|e| {
                error!(
                    license_id = %license_id,
                    endpoint = %endpoint,
                    error = %e,
                    "Usage commit failed"
                );
            })?;

        match outcome {
            UsageCommit::Committed { license, event } => {
                info!(
                    license_id = %license.id,
                    event_id = %event.id,
                    endpoint = %endpoint,
                    usage = license.usage,
                    limit = license.limit,
                    "Usage committed"
                );
                Ok(license)
            }
            UsageCommit::LimitReached => {
                warn!(
                    license_id = %license_id,
                    endpoint = %endpoint,
                    "Limit reached at commit"
                );
                Err(AppError::limit_exceeded("License limit exceeded"))
            }
            UsageCommit::UnknownLicense => {
                Err(AppError::invalid_key("Invalid license key"))
            }
        }
    }

    /// Authorizes `key` and immediately commits one unit.
    pub async fn authorize_and_record(&self, key: &str, endpoint: &str) -> AppResult<License> {
        let license = self.authorize(key).await?;
        self.record_usage(license.id, endpoint).await
    }

    /// Authorizes `key`, runs `work`, and commits one unit if it succeeds.
    ///
    /// A failed `work` consumes nothing. Neither does dropping the
    /// returned future before it completes, since no provisional
    /// reservation is ever written.
    pub async fn run_metered<T, F, Fut>(
        &self,
        key: &str,
        endpoint: &str,
        work: F,
    ) -> AppResult<(T, License)>
    where
        F: FnOnce(License) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let license = self.authorize(key).await?;
        let license_id = license.id;

        let output = work(license).await.inspect_err(|e| {
            warn!(
                license_id = %license_id,
                endpoint = %endpoint,
                error = %e,
                "Metered work failed, no usage recorded"
            );
        })?;

        let license = self.record_usage(license_id, endpoint).await?;
        Ok((output, license))
    }
}
