//! Configuration schema types
//!
//! This module defines the configuration structure mapped from `oasis.toml`.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Persistence backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Append-only JSONL file with a fingerprint index
    #[default]
    Jsonl,
    /// In-memory store (tests and dry runs)
    Memory,
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OasisConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Portal connection and session settings
    pub portal: PortalConfig,

    /// Sync batch settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Persistence settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OasisConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.portal.validate(&self.environment)?;
        self.sync.validate()?;
        self.store.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (extract and map, persist to memory only)
    #[serde(default)]
    pub dry_run: bool,

    /// Actor recorded as the importer on canonical records
    #[serde(default = "default_imported_by")]
    pub imported_by: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        if self.imported_by.trim().is_empty() {
            return Err("imported_by cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Portal connection and browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the claims portal
    pub base_url: String,

    /// Portal account username
    pub username: String,

    /// Portal account password
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Accept the portal's self-signed certificate interstitial
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Run the browser headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Upper bound for a page navigation, in seconds
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Upper bound for a post-action settle wait, in seconds
    #[serde(default = "default_settle_timeout")]
    pub settle_timeout_secs: u64,

    /// Upper bound for a single click/fill action, in seconds
    #[serde(default = "default_action_timeout")]
    pub action_timeout_secs: u64,

    /// Directory for failure screenshots and structural snapshots
    #[serde(default = "default_diagnostics_dir")]
    pub diagnostics_dir: String,
}

impl PortalConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("portal.base_url cannot be empty".to_string());
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("portal.base_url is not a valid URL: {e}"))?;
        if self.username.trim().is_empty() {
            return Err("portal.username cannot be empty".to_string());
        }
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err("portal.base_url must use https in production".to_string());
        }
        for (name, value) in [
            ("navigation_timeout_secs", self.navigation_timeout_secs),
            ("settle_timeout_secs", self.settle_timeout_secs),
            ("action_timeout_secs", self.action_timeout_secs),
        ] {
            if value == 0 || value > 600 {
                return Err(format!("portal.{name} must be within 1..=600, got {value}"));
            }
        }
        Ok(())
    }
}

/// Sync batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Whether scheduled sync is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minutes between scheduled runs, 1..=1440
    #[serde(default = "default_sync_interval")]
    pub sync_interval_minutes: u32,

    /// Import rejected claims
    #[serde(default = "default_true")]
    pub sync_rejections: bool,

    /// Import pending / under-review claims
    #[serde(default)]
    pub sync_pending: bool,

    /// Import approved claims
    #[serde(default)]
    pub sync_approved: bool,

    /// Days to look back when no explicit window is given, 1..=365
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Fire the notifier when a run imports new rejections
    #[serde(default)]
    pub notify_on_new_rejections: bool,

    /// Recipient for rejection notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
}

impl SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.sync_interval_minutes < 1 || self.sync_interval_minutes > 1440 {
            return Err(format!(
                "sync.sync_interval_minutes must be within 1..=1440, got {}",
                self.sync_interval_minutes
            ));
        }
        if self.lookback_days < 1 || self.lookback_days > 365 {
            return Err(format!(
                "sync.lookback_days must be within 1..=365, got {}",
                self.lookback_days
            ));
        }
        if self.notify_on_new_rejections {
            match &self.notification_email {
                Some(email) if email.contains('@') => {}
                Some(email) => {
                    return Err(format!(
                        "sync.notification_email '{email}' is not a valid address"
                    ))
                }
                None => {
                    return Err(
                        "sync.notification_email is required when notify_on_new_rejections is set"
                            .to_string(),
                    )
                }
            }
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sync_interval_minutes: default_sync_interval(),
            sync_rejections: true,
            sync_pending: false,
            sync_approved: false,
            lookback_days: default_lookback_days(),
            notify_on_new_rejections: false,
            notification_email: None,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path to the JSONL file (jsonl backend only)
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Jsonl && self.path.trim().is_empty() {
            return Err("store.path cannot be empty for the jsonl backend".to_string());
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be daily or hourly",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_imported_by() -> String {
    "oasis-sync".to_string()
}

fn default_true() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_settle_timeout() -> u64 {
    15
}

fn default_action_timeout() -> u64 {
    10
}

fn default_diagnostics_dir() -> String {
    "diagnostics".to_string()
}

fn default_sync_interval() -> u32 {
    60
}

fn default_lookback_days() -> u32 {
    30
}

fn default_store_path() -> String {
    "data/rejections.jsonl".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn sample_config() -> OasisConfig {
        OasisConfig {
            application: ApplicationConfig {
                log_level: "info".to_string(),
                dry_run: false,
                imported_by: "oasis-sync".to_string(),
            },
            environment: Environment::Development,
            portal: PortalConfig {
                base_url: "https://oasis.example.sa/portal".to_string(),
                username: "provider-user".to_string(),
                password: secret_string("pw".to_string()),
                accept_invalid_certs: true,
                headless: true,
                navigation_timeout_secs: 30,
                settle_timeout_secs: 15,
                action_timeout_secs: 10,
                diagnostics_dir: "diagnostics".to_string(),
            },
            sync: SyncConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = sample_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut config = sample_config();
        config.portal.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut config = sample_config();
        config.portal.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_https() {
        let mut config = sample_config();
        config.environment = Environment::Production;
        config.portal.base_url = "http://oasis.example.sa".to_string();
        assert!(config.validate().is_err());

        config.portal.base_url = "https://oasis.example.sa".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = sample_config();
        config.portal.navigation_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.portal.navigation_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_interval_bounds() {
        let mut config = sample_config();
        config.sync.sync_interval_minutes = 0;
        assert!(config.validate().is_err());
        config.sync.sync_interval_minutes = 1441;
        assert!(config.validate().is_err());
        config.sync.sync_interval_minutes = 1440;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookback_bounds() {
        let mut config = sample_config();
        config.sync.lookback_days = 0;
        assert!(config.validate().is_err());
        config.sync.lookback_days = 366;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_notify_requires_email() {
        let mut config = sample_config();
        config.sync.notify_on_new_rejections = true;
        assert!(config.validate().is_err());

        config.sync.notification_email = Some("rcm@example.sa".to_string());
        assert!(config.validate().is_ok());

        config.sync.notification_email = Some("not-an-address".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jsonl_store_requires_path() {
        let mut config = sample_config();
        config.store.path = String::new();
        assert!(config.validate().is_err());

        config.store.backend = StoreBackend::Memory;
        assert!(config.validate().is_ok());
    }
}
