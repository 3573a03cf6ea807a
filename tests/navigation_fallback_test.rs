//! Navigation fallback scenarios
//!
//! When the portal revision drops the direct link, the menu item (and
//! then the button) must take over, and the recorded trace must name the
//! strategy that actually worked.

mod common;

use common::{base_config, fixed_clock, home_page_menu_only, FixtureRow};
use oasis_sync::adapters::browser::{PortalDriver, ScriptedDriver};
use oasis_sync::adapters::notify::LogNotifier;
use oasis_sync::adapters::store::MemoryStore;
use oasis_sync::core::navigate::{reach, NavigationGoal, Strategy};
use oasis_sync::core::sync::SyncOrchestrator;
use oasis_sync::domain::{SearchCriteria, SyncStatus};
use chrono::NaiveDate;
use std::sync::Arc;

fn menu_only_portal(rows: &[FixtureRow]) -> ScriptedDriver {
    ScriptedDriver::builder()
        .page("login", common::login_page())
        .page("home", home_page_menu_only())
        .page("search", common::search_page())
        .page("results", common::results_page(rows))
        .page("detail-CLM-001", common::detail_page("CLM-001", "A77"))
        .transition("login", "button:Login", "home")
        .transition("home", "menu:Claims", "search")
        .transition("search", "button:Search", "results")
        .transition("results", "link:CLM-001", "detail-CLM-001")
        .start_at("login")
        .build()
}

#[tokio::test]
async fn test_trace_records_menu_item_strategy() {
    let rows: Vec<FixtureRow> = vec![(Some("CLM-001"), "Rejected")];

    // Drive the login step manually, then ask the strategist for the goal
    let driver = menu_only_portal(&rows);
    driver.click_button("Login").await.unwrap();

    let trace = reach(&driver, &NavigationGoal::ClaimSearch).await.unwrap();

    assert_eq!(trace.steps.len(), 1);
    assert_eq!(trace.steps[0].strategy, Strategy::MenuItem);
    assert_eq!(trace.steps[0].action, "Clicked: Claims");
    assert_eq!(driver.current_page(), "search");
}

#[tokio::test]
async fn test_full_run_succeeds_through_menu_fallback() {
    let rows: Vec<FixtureRow> = vec![(Some("CLM-001"), "Rejected")];
    let driver = Arc::new(menu_only_portal(&rows));
    let store = Arc::new(MemoryStore::new());

    let (_tx, shutdown) = tokio::sync::watch::channel(false);
    let orchestrator = SyncOrchestrator::new(
        base_config(),
        store,
        Arc::new(LogNotifier::new(None)),
        shutdown,
    )
    .with_clock(Arc::new(fixed_clock()));

    let criteria = SearchCriteria::for_window(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
    );
    let result = orchestrator
        .run_sync_with_driver(driver.clone(), criteria)
        .await
        .unwrap();

    assert_eq!(result.status, SyncStatus::Success);
    assert_eq!(result.new_records, 1);

    // The action log proves the menu path was the one taken
    let actions = driver.actions();
    assert!(actions.contains(&"menu:Claims".to_string()));
    assert!(!actions.iter().any(|a| a == "link:Claim Search"));
}
