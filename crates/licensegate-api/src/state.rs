//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use licensegate_core::config::AppConfig;
use licensegate_core::traits::Clock;
use licensegate_database::LedgerStore;
use licensegate_service::{LicenseRegistry, QuotaEnforcer, TextGenerator, UsageReporter};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Ledger store, used directly for health checks
    pub store: Arc<dyn LedgerStore>,
    /// License issuance and lookup
    pub registry: Arc<LicenseRegistry>,
    /// Quota validation and metering
    pub enforcer: Arc<QuotaEnforcer>,
    /// Dashboard aggregation
    pub reporter: Arc<UsageReporter>,
    /// Paid text-generation backend
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Wire the services around one store and clock.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let registry = LicenseRegistry::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.license.clone(),
        );
        let enforcer = QuotaEnforcer::new(Arc::clone(&store), clock);
        let reporter = UsageReporter::new(Arc::clone(&store));

        Self {
            config: Arc::new(config),
            store,
            registry: Arc::new(registry),
            enforcer: Arc::new(enforcer),
            reporter: Arc::new(reporter),
            generator,
        }
    }
}
