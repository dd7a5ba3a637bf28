//! CLI command definitions and dispatch.

pub mod license;
pub mod migrate;
pub mod seed;
pub mod stats;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_core::traits::{Clock, SystemClock};
use licensegate_database::LedgerManager;

/// LicenseGate: license-gated access to a metered text generator
#[derive(Debug, Parser)]
#[command(name = "licensegate", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to load on top of the defaults
    #[arg(short, long, env = "LICENSEGATE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// License management
    License(license::LicenseArgs),
    /// Insert the configured default licenses that are missing
    Seed,
    /// Show dashboard statistics
    Stats,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;

        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::License(args) => license::execute(args, &config, self.format).await,
            Commands::Seed => seed::execute(&config).await,
            Commands::Stats => stats::execute(&config, self.format).await,
        }
    }
}

/// Helper: open the configured ledger store
///
/// Opening a SQL store applies pending migrations.
pub async fn open_ledger(config: &AppConfig) -> Result<LedgerManager, AppError> {
    LedgerManager::open(&config.database).await
}

/// Helper: the wall clock shared by commands that write
pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock::new())
}
