//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("  Environment: {:?}", config.environment);
                println!("  Portal: {}", config.portal.base_url);
                println!("  Username: {}", config.portal.username);
                println!("  Headless: {}", config.portal.headless);
                println!(
                    "  Sync: rejections={} pending={} approved={} lookback={}d",
                    config.sync.sync_rejections,
                    config.sync.sync_pending,
                    config.sync.sync_approved,
                    config.sync.lookback_days
                );
                println!("  Store: {:?} ({})", config.store.backend, config.store.path);
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ Configuration invalid: {e}");
                Ok(2)
            }
        }
    }
}
