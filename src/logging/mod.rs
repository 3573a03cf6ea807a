//! Logging and observability
//!
//! Structured logging with JSON file output and console output for
//! development. Portal credentials never reach a log line; the config
//! layer's `SecretString` redaction guarantees it at the type level.
//!
//! # Example
//!
//! ```no_run
//! use oasis_sync::logging::init_logging;
//! use oasis_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
