//! License management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_entity::{
    License, LicenseChanges, LicenseSummary, UsageEvent, parse_active, parse_limit,
};
use licensegate_service::{CreateLicense, LicenseRegistry, UsageReporter};

/// Arguments for license commands
#[derive(Debug, Args)]
pub struct LicenseArgs {
    /// License subcommand
    #[command(subcommand)]
    pub command: LicenseCommand,
}

/// License subcommands
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Issue a new license
    Create {
        /// Explicit key; generated when omitted
        #[arg(short, long)]
        key: Option<String>,
        /// Lifetime request limit
        #[arg(short, long)]
        limit: Option<String>,
        /// Initial active flag (true/false/1/0)
        #[arg(short, long)]
        active: Option<String>,
    },
    /// Change the limit or active flag of a license
    Update {
        /// License key
        key: String,
        /// New lifetime request limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New active flag (true/false/1/0)
        #[arg(short, long)]
        active: Option<String>,
    },
    /// List all licenses
    List,
    /// Show one license
    Show {
        /// License key
        key: String,
    },
    /// Show the usage trail of one license
    Usage {
        /// License key
        key: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct LicenseRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Usage")]
    usage: i64,
    #[tabled(rename = "Limit")]
    limit: i64,
    #[tabled(rename = "Remaining")]
    remaining: i64,
    #[tabled(rename = "Last Request")]
    last_request: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&LicenseSummary> for LicenseRow {
    fn from(summary: &LicenseSummary) -> Self {
        Self {
            key: summary.key.clone(),
            active: summary.active,
            usage: summary.usage,
            limit: summary.limit,
            remaining: summary.remaining,
            last_request: output::display_time(summary.last_request_at),
            created: summary.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct UsageRow {
    #[tabled(rename = "Event")]
    id: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "At")]
    at: String,
}

impl From<&UsageEvent> for UsageRow {
    fn from(event: &UsageEvent) -> Self {
        Self {
            id: event.id.to_string(),
            endpoint: event.endpoint.clone(),
            at: event.created_at.to_rfc3339(),
        }
    }
}

/// Execute license commands
pub async fn execute(
    args: &LicenseArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ledger = super::open_ledger(config).await?;
    let registry = LicenseRegistry::new(ledger.store(), super::system_clock(), config.license.clone());
    let reporter = UsageReporter::new(ledger.store());

    let result = run(&args.command, &registry, &reporter, format).await;
    ledger.close().await;
    result
}

async fn run(
    command: &LicenseCommand,
    registry: &LicenseRegistry,
    reporter: &UsageReporter,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        LicenseCommand::Create { key, limit, active } => {
            let request = CreateLicense {
                key: key.clone(),
                limit: limit.as_deref().map(parse_limit_arg).transpose()?,
                active: active.as_deref().map(parse_active_arg).transpose()?,
            };
            let license = registry.create_license(request).await?;
            output::print_success(&format!("Created license {}", license.key));
            print_license(&license, format);
        }
        LicenseCommand::Update { key, limit, active } => {
            let changes = LicenseChanges {
                limit: limit.as_deref().map(parse_limit_arg).transpose()?,
                active: active.as_deref().map(parse_active_arg).transpose()?,
            };
            let license = registry.update_license(key, changes).await?;
            output::print_success(&format!("Updated license {}", license.key));
            print_license(&license, format);
        }
        LicenseCommand::List => {
            let summaries: Vec<LicenseSummary> = registry
                .list_all()
                .await?
                .into_iter()
                .map(LicenseSummary::from)
                .collect();
            match format {
                OutputFormat::Json => output::print_json(&summaries),
                OutputFormat::Table => {
                    let rows: Vec<LicenseRow> = summaries.iter().map(LicenseRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        LicenseCommand::Show { key } => {
            let license = registry
                .get_by_key(key)
                .await?
                .ok_or_else(|| AppError::not_found("License not found"))?;
            print_license(&license, format);
        }
        LicenseCommand::Usage { key } => {
            let events = reporter.license_usage(key).await?;
            match format {
                OutputFormat::Json => output::print_json(&events),
                OutputFormat::Table => {
                    let rows: Vec<UsageRow> = events.iter().map(UsageRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}

fn print_license(license: &License, format: OutputFormat) {
    let summary = LicenseSummary::from(license);
    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Table => {
            output::print_kv("Key", &summary.key);
            output::print_kv("ID", &license.id.to_string());
            output::print_kv("Active", &summary.active.to_string());
            output::print_kv("Usage", &format!("{} / {}", summary.usage, summary.limit));
            output::print_kv("Remaining", &summary.remaining.to_string());
            output::print_kv("Last Request", &output::display_time(summary.last_request_at));
            output::print_kv("Created", &summary.created_at.to_rfc3339());
            output::print_kv("Updated", &license.updated_at.to_rfc3339());
        }
    }
}

fn parse_limit_arg(raw: &str) -> Result<i64, AppError> {
    parse_limit(&Value::String(raw.to_string()))
}

fn parse_active_arg(raw: &str) -> Result<bool, AppError> {
    parse_active(&Value::String(raw.to_string()))
}
