//! Database migration command.

use crate::output;
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_database::{DatabasePool, run_migrations};

/// Execute the migrate command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != "sqlite" {
        output::print_warning(&format!(
            "Provider '{}' keeps no schema, nothing to migrate",
            config.database.provider
        ));
        return Ok(());
    }

    let db = DatabasePool::connect(&config.database).await?;

    println!("Running database migrations...");
    let result = run_migrations(db.pool()).await;
    db.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
