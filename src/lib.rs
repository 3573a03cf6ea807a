// oasis-sync - OASIS claims portal extraction and reconciliation pipeline
// Copyright (c) 2025 BrainSAIT RCM Team
// Licensed under the MIT License

//! # oasis-sync
//!
//! A browser-driven extraction and reconciliation pipeline for the OASIS
//! claims portal. The portal exposes no API, so claim and rejection
//! records are recovered through an automated browser session, resilient
//! page heuristics, and tolerant parsing, then translated into the
//! platform's canonical bilingual rejection records.
//!
//! ## Overview
//!
//! One sync run performs:
//! - **Session control** - launch an isolated browser, authenticate,
//!   capture cookies, tear down on every exit path
//! - **Structure analysis** - descriptive snapshots of each page (forms,
//!   buttons, links, tables) independent of business meaning
//! - **Strategy navigation** - reach goals through an ordered list of
//!   strategies (link text, menu item, button), recording which worked
//! - **Extraction** - label-pattern form filling, row-by-row result
//!   parsing, label-proximity detail reads; one failed row never aborts
//!   a page
//! - **Canonical mapping** - deadlines, compliance flags, and risk
//!   derivation under an injected clock
//! - **Reconciliation** - one [`domain::SyncResult`] per run in which
//!   every fetched row lands in exactly one bucket
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (session, analyze, navigate, extract, map, sync)
//! - [`adapters`] - External seams (browser driver, store, notifier)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oasis_sync::adapters::notify::LogNotifier;
//! use oasis_sync::adapters::store::create_store;
//! use oasis_sync::config::load_config;
//! use oasis_sync::core::sync::SyncOrchestrator;
//! use oasis_sync::domain::SearchCriteria;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("oasis.toml")?;
//!     let store = create_store(&config.store).await?;
//!     let notifier = Arc::new(LogNotifier::new(None));
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//!     let orchestrator = SyncOrchestrator::new(config, store, notifier, shutdown);
//!     let criteria = SearchCriteria::for_window(
//!         chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
//!     );
//!
//!     let result = orchestrator.run_sync(criteria).await?;
//!     println!("Imported {} records", result.total_imported());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. Authentication
//! failures are fatal (the portal locks accounts on retries); per-row and
//! per-claim failures are folded into the batch result and never abort a
//! run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
