//! Default license seeding command.

use crate::output;
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_service::LicenseRegistry;

/// Execute the seed command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let ledger = super::open_ledger(config).await?;
    let registry = LicenseRegistry::new(ledger.store(), super::system_clock(), config.license.clone());

    let result = registry.seed_defaults(&config.license.seed).await;
    ledger.close().await;
    let inserted = result?;

    output::print_success(&format!(
        "Seeded {} of {} default licenses",
        inserted,
        config.license.seed.len()
    ));
    Ok(())
}
