//! Scripted driver backed by canned page snapshots
//!
//! Replays a fixed set of [`PageStructure`] snapshots connected by an
//! action transition table. Navigation strategies, field matching, and the
//! whole orchestrator run against it exactly as they do against Chrome,
//! which is how the batch scenarios are rehearsed offline and tested.

use super::driver::{CookieSnapshot, PortalDriver};
use crate::core::analyze::PageStructure;
use crate::domain::{OasisError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One scripted page: its structure and where actions lead
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub structure: PageStructure,
    /// Action key (e.g. `link:CLM-1`, `button:Search`) -> target page id
    pub transitions: HashMap<String, String>,
}

#[derive(Debug)]
struct ScriptedState {
    current: String,
    history: Vec<String>,
    actions: Vec<String>,
    closed: bool,
}

/// Deterministic in-memory driver
pub struct ScriptedDriver {
    pages: HashMap<String, ScriptedPage>,
    cookies: Vec<CookieSnapshot>,
    /// Action key -> error message, for rehearsing per-item failures
    failures: HashMap<String, String>,
    state: Mutex<ScriptedState>,
}

impl ScriptedDriver {
    /// Creates a new builder.
    pub fn builder() -> ScriptedDriverBuilder {
        ScriptedDriverBuilder::default()
    }

    /// Action log, for asserting on what the pipeline actually did.
    pub fn actions(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.actions.clone())
            .unwrap_or_default()
    }

    /// Id of the page the driver is currently on.
    pub fn current_page(&self) -> String {
        self.state
            .lock()
            .map(|s| s.current.clone())
            .unwrap_or_default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ScriptedState) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| OasisError::Session("scripted driver state poisoned".to_string()))?;
        if state.closed {
            return Err(OasisError::Session("driver closed".to_string()));
        }
        f(&mut state)
    }

    fn apply_action(&self, key: String) -> Result<()> {
        if let Some(message) = self.failures.get(&key) {
            self.with_state(|state| {
                state.actions.push(key.clone());
                Ok(())
            })?;
            return Err(OasisError::Network(message.clone()));
        }

        self.with_state(|state| {
            state.actions.push(key.clone());
            let page = self.pages.get(&state.current).ok_or_else(|| {
                OasisError::Session(format!("scripted driver lost on page '{}'", state.current))
            })?;
            match page.transitions.get(&key) {
                Some(target) => {
                    state.history.push(state.current.clone());
                    state.current = target.clone();
                    Ok(())
                }
                None => Err(OasisError::Network(format!(
                    "no element for action '{key}' on page '{}'",
                    state.current
                ))),
            }
        })
    }

    fn current_structure(&self) -> Result<PageStructure> {
        self.with_state(|state| {
            self.pages
                .get(&state.current)
                .map(|p| p.structure.clone())
                .ok_or_else(|| {
                    OasisError::Session(format!(
                        "scripted driver lost on page '{}'",
                        state.current
                    ))
                })
        })
    }
}

#[async_trait]
impl PortalDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let target = self
            .pages
            .iter()
            .find(|(_, page)| page.structure.url == url)
            .map(|(id, _)| id.clone());

        self.with_state(|state| {
            state.actions.push(format!("navigate:{url}"));
            match target {
                Some(id) => {
                    state.history.push(state.current.clone());
                    state.current = id;
                    Ok(())
                }
                None => Err(OasisError::Network(format!("no scripted page at {url}"))),
            }
        })
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current_structure()?.url)
    }

    async fn evaluate_json(&self, _script: &str) -> Result<serde_json::Value> {
        let structure = self.current_structure()?;
        serde_json::to_value(&structure).map_err(Into::into)
    }

    async fn click_link(&self, text: &str) -> Result<()> {
        self.apply_action(format!("link:{text}"))
    }

    async fn click_menu_item(&self, text: &str) -> Result<()> {
        self.apply_action(format!("menu:{text}"))
    }

    async fn click_button(&self, text: &str) -> Result<()> {
        self.apply_action(format!("button:{text}"))
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        self.with_state(|state| {
            state.actions.push(format!("fill:{selector}={value}"));
            Ok(())
        })
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.with_state(|state| {
            state.actions.push(format!("select:{selector}={value}"));
            Ok(())
        })
    }

    async fn wait_for_settle(&self) -> Result<()> {
        Ok(())
    }

    async fn go_back(&self) -> Result<()> {
        self.with_state(|state| {
            state.actions.push("back".to_string());
            if let Some(previous) = state.history.pop() {
                state.current = previous;
            }
            Ok(())
        })
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        // Minimal valid PNG header; enough for diagnostics plumbing
        Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    }

    async fn cookies(&self) -> Result<Vec<CookieSnapshot>> {
        Ok(self.cookies.clone())
    }

    async fn close(&self) -> Result<()> {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
        Ok(())
    }
}

/// Builder for [`ScriptedDriver`]
#[derive(Default)]
pub struct ScriptedDriverBuilder {
    pages: HashMap<String, ScriptedPage>,
    cookies: Vec<CookieSnapshot>,
    failures: HashMap<String, String>,
    start: Option<String>,
}

impl ScriptedDriverBuilder {
    /// Adds a page under an id.
    pub fn page(mut self, id: impl Into<String>, structure: PageStructure) -> Self {
        self.pages.insert(
            id.into(),
            ScriptedPage {
                structure,
                transitions: HashMap::new(),
            },
        );
        self
    }

    /// Adds a transition: performing `action` on `from` lands on `to`.
    ///
    /// Action keys: `link:{text}`, `menu:{text}`, `button:{text}`.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        action: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let from = from.into();
        if let Some(page) = self.pages.get_mut(&from) {
            page.transitions.insert(action.into(), to.into());
        }
        self
    }

    /// Makes an action fail with the given message instead of transitioning.
    pub fn fail_action(mut self, action: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(action.into(), message.into());
        self
    }

    /// Adds a cookie to the snapshot the driver reports.
    pub fn cookie(mut self, cookie: CookieSnapshot) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Sets the starting page id.
    pub fn start_at(mut self, id: impl Into<String>) -> Self {
        self.start = Some(id.into());
        self
    }

    /// Builds the driver.
    ///
    /// # Panics
    ///
    /// Panics when no pages were added; a scripted run needs somewhere to
    /// start.
    pub fn build(self) -> ScriptedDriver {
        let start = self
            .start
            .or_else(|| self.pages.keys().next().cloned())
            .expect("scripted driver needs at least one page");
        ScriptedDriver {
            pages: self.pages,
            cookies: self.cookies,
            failures: self.failures,
            state: Mutex::new(ScriptedState {
                current: start,
                history: Vec::new(),
                actions: Vec::new(),
                closed: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyze::LinkStructure;

    fn page_with_link(url: &str, link: &str) -> PageStructure {
        PageStructure {
            url: url.to_string(),
            links: vec![LinkStructure {
                text: link.to_string(),
                href: Some("#".to_string()),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_transition_on_click() {
        let driver = ScriptedDriver::builder()
            .page("home", page_with_link("https://portal/home", "Claims"))
            .page("claims", page_with_link("https://portal/claims", "Back"))
            .transition("home", "link:Claims", "claims")
            .start_at("home")
            .build();

        driver.click_link("Claims").await.unwrap();
        assert_eq!(driver.current_page(), "claims");
        assert_eq!(driver.actions(), vec!["link:Claims"]);
    }

    #[tokio::test]
    async fn test_unknown_action_errors() {
        let driver = ScriptedDriver::builder()
            .page("home", page_with_link("https://portal/home", "Claims"))
            .start_at("home")
            .build();

        let err = driver.click_button("Missing").await.unwrap_err();
        assert!(matches!(err, OasisError::Network(_)));
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let driver = ScriptedDriver::builder()
            .page("home", page_with_link("https://portal/home", "CLM-7"))
            .transition("home", "link:CLM-7", "home")
            .fail_action("link:CLM-7", "portal error 500")
            .start_at("home")
            .build();

        let err = driver.click_link("CLM-7").await.unwrap_err();
        assert!(err.to_string().contains("portal error 500"));
    }

    #[tokio::test]
    async fn test_go_back_restores_previous_page() {
        let driver = ScriptedDriver::builder()
            .page("home", page_with_link("https://portal/home", "Claims"))
            .page("claims", page_with_link("https://portal/claims", "x"))
            .transition("home", "link:Claims", "claims")
            .start_at("home")
            .build();

        driver.click_link("Claims").await.unwrap();
        driver.go_back().await.unwrap();
        assert_eq!(driver.current_page(), "home");
    }

    #[tokio::test]
    async fn test_closed_driver_rejects_actions() {
        let driver = ScriptedDriver::builder()
            .page("home", page_with_link("https://portal/home", "Claims"))
            .start_at("home")
            .build();

        driver.close().await.unwrap();
        assert!(driver.current_url().await.is_err());
        // close stays idempotent
        driver.close().await.unwrap();
    }
}
