//! Sync command implementation
//!
//! Runs one batch: search the configured window, extract, map, persist,
//! and print the reconciliation report.

use crate::adapters::notify::LogNotifier;
use crate::adapters::store::create_store;
use crate::config::{load_config, StoreBackend};
use crate::core::sync::SyncOrchestrator;
use crate::domain::{SearchCriteria, SyncStatus};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - extract and map, persist to memory only
    #[arg(long)]
    pub dry_run: bool,

    /// Window start (YYYY-MM-DD); defaults to lookback_days before today
    #[arg(long)]
    pub from: Option<String>,

    /// Window end (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict the search to one claim number
    #[arg(long)]
    pub claim_number: Option<String>,

    /// Override result page size (1-1000)
    #[arg(long)]
    pub page_size: Option<u32>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = load_config(config_path)?;

        if self.dry_run {
            tracing::info!("Dry-run mode: records go to the in-memory store");
            config.application.dry_run = true;
            config.store.backend = StoreBackend::Memory;
        }

        let today = Utc::now().date_naive();
        let from_date = match &self.from {
            Some(s) => parse_cli_date(s)?,
            None => today - Duration::days(i64::from(config.sync.lookback_days)),
        };
        let to_date = match &self.to {
            Some(s) => parse_cli_date(s)?,
            None => today,
        };

        let mut builder = SearchCriteria::builder().from_date(from_date).to_date(to_date);
        if let Some(claim_number) = &self.claim_number {
            builder = builder.claim_number(claim_number);
        }
        if let Some(page_size) = self.page_size {
            builder = builder.page_size(page_size);
        }
        let criteria = builder.build().map_err(|e| anyhow::anyhow!("{e}"))?;

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !self.dry_run {
            println!("Sync configuration:");
            println!("  Portal: {}", config.portal.base_url);
            println!("  Window: {} .. {}", criteria.from_date, criteria.to_date);
            println!(
                "  Importing: rejections={} pending={} approved={}",
                config.sync.sync_rejections, config.sync.sync_pending, config.sync.sync_approved
            );
            println!();
            print!("Proceed with sync? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Sync cancelled.");
                return Ok(0);
            }
        }

        let store = create_store(&config.store).await?;
        let notifier = Arc::new(LogNotifier::new(config.sync.notification_email.clone()));

        let orchestrator = SyncOrchestrator::new(
            config,
            store,
            notifier,
            shutdown_signal.clone(),
        );

        println!("🚀 Starting sync...");
        println!();

        let result = orchestrator.run_sync(criteria).await?;

        println!();
        println!("📊 Reconciliation report:");
        println!("  Batch: {}", result.batch_id);
        println!("  Window: {} .. {}", result.window_from, result.window_to);
        println!("  Fetched: {}", result.total_fetched);
        println!("  New: {}", result.new_records);
        println!("  Updated: {}", result.updated_records);
        println!("  Skipped: {}", result.total_skipped);
        println!("  Errors: {}", result.total_errors);
        if let Some(duration) = result.duration() {
            println!("  Duration: {:.2}s", duration.as_secs_f64());
        }
        println!();

        if !result.accounting_balanced() {
            println!("⚠️  Accounting mismatch: fetched != imported + skipped + errors");
            println!();
        }

        if !result.errors.is_empty() {
            println!("⚠️  Errors encountered:");
            for item in &result.errors {
                match &item.claim_number {
                    Some(claim) => println!("  - {claim}: {}", item.error),
                    None => println!("  - {}", item.error),
                }
            }
            println!();
        }

        let exit_code = if *shutdown_signal.borrow() {
            println!("⚠️  Sync interrupted gracefully.");
            130
        } else {
            match result.status {
                SyncStatus::Success => {
                    println!("✅ Sync completed successfully!");
                    0
                }
                SyncStatus::Partial => {
                    println!("⚠️  Sync completed with failures");
                    1
                }
                SyncStatus::Failed => {
                    println!("❌ Sync failed");
                    5
                }
            }
        };

        Ok(exit_code)
    }
}

fn parse_cli_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{s}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_date() {
        assert_eq!(
            parse_cli_date("2025-01-20").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
        );
        assert!(parse_cli_date("20/01/2025").is_err());
    }

    #[test]
    fn test_sync_args_defaults() {
        let args = SyncArgs {
            yes: false,
            dry_run: false,
            from: None,
            to: None,
            claim_number: None,
            page_size: None,
        };

        assert!(!args.yes);
        assert!(!args.dry_run);
        assert!(args.from.is_none());
        assert!(args.claim_number.is_none());
    }
}
