//! Init command implementation
//!
//! Writes a starter configuration file with commented defaults.

use clap::Args;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "oasis.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

const TEMPLATE: &str = r#"# oasis-sync configuration

[application]
log_level = "info"
# Actor recorded on imported records
imported_by = "oasis-sync"

# development, staging, or production (production enforces https)
environment = "development"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
# Keep the password out of this file; set OASIS_PORTAL_PASSWORD instead
password = "${OASIS_PORTAL_PASSWORD}"
# The portal presents a certificate browsers won't trust
accept_invalid_certs = true
headless = true
navigation_timeout_secs = 30
settle_timeout_secs = 15
action_timeout_secs = 10
diagnostics_dir = "diagnostics"

[sync]
enabled = true
sync_interval_minutes = 60
sync_rejections = true
sync_pending = false
sync_approved = false
lookback_days = 30
notify_on_new_rejections = false
# notification_email = "rcm@example.sa"

[store]
backend = "jsonl"
path = "data/rejections.jsonl"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);

        if path.exists() && !self.force {
            eprintln!(
                "{} already exists; use --force to overwrite",
                path.display()
            );
            return Ok(2);
        }

        tokio::fs::write(path, TEMPLATE).await?;
        println!("✅ Wrote starter configuration to {}", path.display());
        println!("   Set OASIS_PORTAL_PASSWORD before running a sync.");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oasis.toml");
        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[portal]"));
        assert!(contents.contains("${OASIS_PORTAL_PASSWORD}"));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oasis.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oasis.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[portal]"));
    }
}
