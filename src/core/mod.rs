//! Core business logic for the OASIS pipeline.
//!
//! # Modules
//!
//! - [`session`] - browser session lifecycle (launch, login, teardown)
//! - [`analyze`] - structural page snapshots
//! - [`navigate`] - ordered-strategy navigation to named goals
//! - [`extract`] - search execution and tolerant result parsing
//! - [`map`] - canonical mapping with deadline/risk derivation
//! - [`sync`] - batch orchestration and reconciliation accounting
//!
//! # Pipeline
//!
//! One sync run flows through these modules in order:
//!
//! 1. **Session**: authenticate and capture the cookie set
//! 2. **Navigate**: reach the claim search through the strategy list
//! 3. **Extract**: issue the search, parse rows, drill into details
//! 4. **Map**: translate to canonical records (injected clock)
//! 5. **Persist**: upsert each record individually
//! 6. **Reconcile**: one `SyncResult` accounting for every fetched row
//!
//! ```rust,no_run
//! use oasis_sync::adapters::notify::LogNotifier;
//! use oasis_sync::adapters::store::create_store;
//! use oasis_sync::config::load_config;
//! use oasis_sync::core::sync::SyncOrchestrator;
//! use oasis_sync::domain::SearchCriteria;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("oasis.toml")?;
//! let store = create_store(&config.store).await?;
//! let notifier = Arc::new(LogNotifier::new(config.sync.notification_email.clone()));
//! let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//! let orchestrator = SyncOrchestrator::new(config, store, notifier, shutdown);
//! let criteria = SearchCriteria::for_window(
//!     chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
//! );
//! let result = orchestrator.run_sync(criteria).await?;
//! println!("Imported {}", result.total_imported());
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod extract;
pub mod map;
pub mod navigate;
pub mod session;
pub mod sync;
