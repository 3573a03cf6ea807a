//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// OASIS portal sync pipeline
#[derive(Parser, Debug)]
#[command(name = "oasis-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "oasis.toml", env = "OASIS_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OASIS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one sync batch against the portal
    Sync(commands::sync::SyncArgs),

    /// Capture and print a page's structural snapshot
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
