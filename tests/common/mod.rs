//! Shared fixtures: a scripted portal with login, search, results, and
//! detail pages wired together the way the real OASIS portal lays them
//! out.

// Each integration test crate uses a different subset of these fixtures
#![allow(dead_code)]

use oasis_sync::adapters::browser::{CookieSnapshot, ScriptedDriver, ScriptedDriverBuilder};
use oasis_sync::config::{
    secret_string, ApplicationConfig, Environment, LoggingConfig, OasisConfig, PortalConfig,
    StoreBackend, StoreConfig, SyncConfig,
};
use oasis_sync::core::analyze::{
    ButtonStructure, FieldStructure, FormStructure, LabeledValue, LinkStructure,
    MenuItemStructure, PageStructure, TableStructure,
};
use oasis_sync::core::map::FixedClock;
use chrono::{TimeZone, Utc};

pub const PORTAL_URL: &str = "https://portal.example.sa/login";

/// One scripted result row: `None` renders an unparseable row.
pub type FixtureRow = (Option<&'static str>, &'static str);

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 2, 1, 6, 0, 0).unwrap())
}

pub fn base_config() -> OasisConfig {
    OasisConfig {
        application: ApplicationConfig {
            log_level: "info".to_string(),
            dry_run: false,
            imported_by: "test-sync".to_string(),
        },
        environment: Environment::Development,
        portal: PortalConfig {
            base_url: PORTAL_URL.to_string(),
            username: "provider-user".to_string(),
            password: secret_string("pw".to_string()),
            accept_invalid_certs: true,
            headless: true,
            navigation_timeout_secs: 5,
            settle_timeout_secs: 2,
            action_timeout_secs: 2,
            diagnostics_dir: std::env::temp_dir()
                .join("oasis-sync-test-diag")
                .to_string_lossy()
                .into_owned(),
        },
        sync: SyncConfig::default(),
        store: StoreConfig {
            backend: StoreBackend::Memory,
            path: String::new(),
        },
        logging: LoggingConfig {
            local_enabled: false,
            local_path: String::new(),
            local_rotation: "daily".to_string(),
        },
    }
}

pub fn login_page() -> PageStructure {
    PageStructure {
        url: PORTAL_URL.to_string(),
        title: "OASIS Login".to_string(),
        forms: vec![FormStructure {
            id: Some("loginForm".to_string()),
            fields: vec![
                FieldStructure {
                    name: Some("username".to_string()),
                    selector: "input[name=\"username\"]".to_string(),
                    field_type: "text".to_string(),
                    required: true,
                    ..Default::default()
                },
                FieldStructure {
                    name: Some("password".to_string()),
                    selector: "input[name=\"password\"]".to_string(),
                    field_type: "password".to_string(),
                    required: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        buttons: vec![ButtonStructure {
            text: "Login".to_string(),
            selector: "#login".to_string(),
            button_type: Some("submit".to_string()),
        }],
        ..Default::default()
    }
}

pub fn home_page() -> PageStructure {
    PageStructure {
        url: "https://portal.example.sa/home".to_string(),
        title: "OASIS Home".to_string(),
        links: vec![
            LinkStructure {
                text: "Claim Search".to_string(),
                href: Some("/claims/search".to_string()),
            },
            LinkStructure {
                text: "Logout".to_string(),
                href: Some("/logout".to_string()),
            },
        ],
        ..Default::default()
    }
}

/// Home variant with the claims entry only in the navigation menu.
pub fn home_page_menu_only() -> PageStructure {
    PageStructure {
        url: "https://portal.example.sa/home".to_string(),
        title: "OASIS Home".to_string(),
        links: vec![LinkStructure {
            text: "Logout".to_string(),
            href: Some("/logout".to_string()),
        }],
        menu_items: vec![MenuItemStructure {
            text: "Claims".to_string(),
            href: Some("/claims/search".to_string()),
        }],
        ..Default::default()
    }
}

pub fn search_page() -> PageStructure {
    PageStructure {
        url: "https://portal.example.sa/claims/search".to_string(),
        title: "Claim Search".to_string(),
        forms: vec![FormStructure {
            id: Some("searchForm".to_string()),
            fields: vec![
                FieldStructure {
                    name: Some("fromDate".to_string()),
                    selector: "input[name=\"fromDate\"]".to_string(),
                    field_type: "date".to_string(),
                    label: Some("From Date".to_string()),
                    required: true,
                    ..Default::default()
                },
                FieldStructure {
                    name: Some("toDate".to_string()),
                    selector: "input[name=\"toDate\"]".to_string(),
                    field_type: "date".to_string(),
                    label: Some("To Date".to_string()),
                    required: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        buttons: vec![ButtonStructure {
            text: "Search".to_string(),
            selector: "#search".to_string(),
            button_type: Some("submit".to_string()),
        }],
        ..Default::default()
    }
}

pub fn results_page(rows: &[FixtureRow]) -> PageStructure {
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(claim, status)| match claim {
            Some(number) => vec![
                (*number).to_string(),
                "Ahmed Ali".to_string(),
                "2025-01-20".to_string(),
                "1000.00".to_string(),
                "150.00".to_string(),
                "1,150.00".to_string(),
                (*status).to_string(),
            ],
            None => vec![
                "".to_string(),
                "".to_string(),
                "??".to_string(),
                "".to_string(),
                "".to_string(),
                "".to_string(),
                (*status).to_string(),
            ],
        })
        .collect();

    let links = rows
        .iter()
        .filter_map(|(claim, _)| *claim)
        .map(|number| LinkStructure {
            text: number.to_string(),
            href: Some(format!("/claims/{number}")),
        })
        .collect();

    PageStructure {
        url: "https://portal.example.sa/claims/results".to_string(),
        title: "Search Results".to_string(),
        links,
        tables: vec![TableStructure {
            row_count: table_rows.len(),
            headers: vec![
                "Claim Number".to_string(),
                "Patient Name".to_string(),
                "Submission Date".to_string(),
                "Net".to_string(),
                "VAT".to_string(),
                "Total".to_string(),
                "Status".to_string(),
            ],
            rows: table_rows,
        }],
        ..Default::default()
    }
}

pub fn detail_page(claim_number: &str, code: &str) -> PageStructure {
    PageStructure {
        url: format!("https://portal.example.sa/claims/{claim_number}"),
        title: format!("Claim {claim_number}"),
        labeled_values: vec![
            LabeledValue {
                label: "Rejection Code".to_string(),
                value: code.to_string(),
            },
            LabeledValue {
                label: "Rejection Reason".to_string(),
                value: "Not medically necessary".to_string(),
            },
            LabeledValue {
                label: "Rejection Date".to_string(),
                value: "2025-01-25".to_string(),
            },
            LabeledValue {
                label: "Rejected Amount".to_string(),
                value: "1,150.00".to_string(),
            },
            LabeledValue {
                label: "Insurance Company".to_string(),
                value: "Best Insurance".to_string(),
            },
        ],
        ..Default::default()
    }
}

/// Builds the whole scripted portal for a result set.
///
/// Login leads home, home links to the search form, searching lands on
/// the results table, and every parseable rejected claim gets a detail
/// page reachable through its claim-number link.
pub fn portal_with_results(rows: &[FixtureRow]) -> ScriptedDriver {
    let mut builder: ScriptedDriverBuilder = ScriptedDriver::builder()
        .page("login", login_page())
        .page("home", home_page())
        .page("search", search_page())
        .page("results", results_page(rows))
        .transition("login", "button:Login", "home")
        .transition("home", "link:Claim Search", "search")
        .transition("search", "button:Search", "results")
        .cookie(CookieSnapshot {
            name: "JSESSIONID".to_string(),
            domain: "portal.example.sa".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
        })
        .start_at("login");

    for (claim, status) in rows {
        if let Some(number) = claim {
            if *status == "Rejected" {
                let page_id = format!("detail-{number}");
                builder = builder
                    .page(page_id.clone(), detail_page(number, "MED-001"))
                    .transition("results", format!("link:{number}"), page_id);
            }
        }
    }

    builder.build()
}
