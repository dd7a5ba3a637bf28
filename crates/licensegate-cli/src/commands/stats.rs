//! Dashboard statistics command.

use crate::output::{self, OutputFormat};
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_service::{DashboardStats, UsageReporter};

/// Execute the stats command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ledger = super::open_ledger(config).await?;
    let result = UsageReporter::new(ledger.store()).dashboard_stats().await;
    ledger.close().await;
    let stats = result?;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Table => print_table(&stats),
    }
    Ok(())
}

fn print_table(stats: &DashboardStats) {
    let server = &stats.server_stats;

    println!("Licenses:");
    output::print_kv("Total", &stats.total_keys.to_string());
    output::print_kv("Active", &stats.active_keys.to_string());
    output::print_kv("Inactive", &stats.inactive_keys.to_string());

    println!("Requests:");
    output::print_kv("Total", &server.total_requests.to_string());
    output::print_kv("Today", &server.requests_today.to_string());
    output::print_kv("Last Activity", &output::display_time(server.last_activity));

    if !server.requests_per_key.is_empty() {
        println!("Requests per key:");
        for (key, count) in &server.requests_per_key {
            output::print_kv(key, &count.to_string());
        }
    }
}
