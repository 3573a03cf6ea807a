//! Portal driver trait
//!
//! This module defines the `PortalDriver` trait that abstracts the driven
//! browser session. The live implementation drives headless Chrome; the
//! scripted implementation replays canned page snapshots so navigation and
//! extraction heuristics can be exercised without a browser.
//!
//! No component holds its own reference to the underlying browser; the
//! driver handle is owned by the session and passed down explicitly, which
//! prevents use-after-close defects.

use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of one browser cookie
///
/// Values are deliberately not captured; cookie names and flags are enough
/// to classify the session mechanism and values would put session tokens
/// into diagnostics output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieSnapshot {
    pub name: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
}

/// Abstraction over a driven browser session
///
/// Every action carries an explicit timeout in the implementation; a hung
/// portal page surfaces as an error, never as an indefinite wait.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    /// Navigates to an absolute URL and waits for the load to finish.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the page currently loaded.
    async fn current_url(&self) -> Result<String>;

    /// Runs a script that produces a JSON string and returns it parsed.
    ///
    /// Used by the structure analyzer to run its collector in-page.
    async fn evaluate_json(&self, script: &str) -> Result<serde_json::Value>;

    /// Clicks the first link whose visible text matches exactly.
    async fn click_link(&self, text: &str) -> Result<()>;

    /// Clicks the first menu/list item whose visible text matches exactly.
    async fn click_menu_item(&self, text: &str) -> Result<()>;

    /// Clicks the first button whose visible text matches exactly.
    async fn click_button(&self, text: &str) -> Result<()>;

    /// Types a value into the field addressed by a CSS selector.
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Selects an option (by visible text) in a choice field.
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    /// Waits for in-flight navigation/XHR to settle, bounded by the
    /// configured settle timeout.
    async fn wait_for_settle(&self) -> Result<()>;

    /// Navigates one step back in session history.
    async fn go_back(&self) -> Result<()>;

    /// Captures a PNG screenshot of the current viewport.
    async fn capture_screenshot(&self) -> Result<Vec<u8>>;

    /// Snapshot of the cookies visible to the current page.
    async fn cookies(&self) -> Result<Vec<CookieSnapshot>>;

    /// Releases the underlying browser context. Idempotent.
    async fn close(&self) -> Result<()>;
}
