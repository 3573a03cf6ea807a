//! Configuration management for the OASIS pipeline.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `OASIS_*` environment variable overrides
//! - Default values for optional settings
//! - Comprehensive validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [portal]
//! base_url = "https://oasis.example.sa/portal"
//! username = "provider-user"
//! password = "${OASIS_PORTAL_PASSWORD}"
//!
//! [sync]
//! lookback_days = 30
//! sync_rejections = true
//!
//! [store]
//! backend = "jsonl"
//! path = "data/rejections.jsonl"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use oasis_sync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("oasis.toml")?;
//! println!("Portal: {}", config.portal.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, LoggingConfig, OasisConfig, PortalConfig, StoreBackend,
    StoreConfig, SyncConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
