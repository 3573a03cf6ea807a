//! Headless Chrome driver
//!
//! Drives the portal through a dedicated Chrome process. Every blocking
//! browser call runs on the blocking thread pool and is wrapped in an
//! explicit timeout, so a hung portal page becomes a `Network` error
//! instead of a stalled run. The browser process is killed when the last
//! handle drops, so teardown happens even if `close` was never reached.

use super::driver::{CookieSnapshot, PortalDriver};
use crate::config::PortalConfig;
use crate::domain::{OasisError, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Live driver over a headless Chrome session
pub struct ChromeDriver {
    /// Kept so the process lives as long as the driver; taken on close
    browser: Mutex<Option<Browser>>,
    tab: Arc<Tab>,
    navigation_timeout: Duration,
    action_timeout: Duration,
    settle_timeout: Duration,
}

impl ChromeDriver {
    /// Launches an isolated browser context for one session.
    ///
    /// # Errors
    ///
    /// Returns [`OasisError::Session`] when the browser cannot be
    /// launched or no tab can be opened.
    pub async fn launch(config: &PortalConfig) -> Result<Self> {
        let headless = config.headless;
        let accept_invalid_certs = config.accept_invalid_certs;
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

        let (browser, tab) = tokio::task::spawn_blocking(move || {
            let options = LaunchOptions::default_builder()
                .headless(headless)
                .ignore_certificate_errors(accept_invalid_certs)
                .idle_browser_timeout(Duration::from_secs(300))
                .build()
                .map_err(|e| OasisError::Session(format!("Invalid launch options: {e}")))?;

            let browser = Browser::new(options)
                .map_err(|e| OasisError::Session(format!("Failed to launch browser: {e}")))?;
            let tab = browser
                .new_tab()
                .map_err(|e| OasisError::Session(format!("Failed to open tab: {e}")))?;
            tab.set_default_timeout(navigation_timeout);
            Ok::<_, OasisError>((browser, tab))
        })
        .await
        .map_err(|e| OasisError::Session(format!("Browser launch task failed: {e}")))??;

        tracing::debug!(
            headless = headless,
            accept_invalid_certs = accept_invalid_certs,
            "Browser session launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            tab,
            navigation_timeout,
            action_timeout: Duration::from_secs(config.action_timeout_secs),
            settle_timeout: Duration::from_secs(config.settle_timeout_secs),
        })
    }

    /// Runs a blocking tab operation with the given timeout.
    async fn blocking<T, F>(&self, action: &str, timeout: Duration, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Tab>) -> Result<T> + Send + 'static,
    {
        let tab = self.tab.clone();
        let task = tokio::task::spawn_blocking(move || f(tab));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(OasisError::Session(format!("{action} task failed: {e}"))),
            Err(_) => Err(OasisError::Network(format!(
                "{action} timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    /// XPath-safe literal: quotes are stripped, not escaped, because the
    /// portal never uses them in actionable text.
    fn xpath_literal(text: &str) -> String {
        text.replace(['\'', '"'], "")
    }

    async fn click_by_xpath(&self, action: &str, xpath: String) -> Result<()> {
        self.blocking(action, self.action_timeout, move |tab| {
            let element = tab
                .find_element_by_xpath(&xpath)
                .map_err(|e| OasisError::Network(format!("Element not found: {e}")))?;
            element
                .click()
                .map_err(|e| OasisError::Network(format!("Click failed: {e}")))?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl PortalDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        self.blocking("navigate", self.navigation_timeout, move |tab| {
            tab.navigate_to(&url)
                .map_err(|e| OasisError::Network(format!("Navigation failed: {e}")))?;
            tab.wait_until_navigated()
                .map_err(|e| OasisError::Network(format!("Page load failed: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn current_url(&self) -> Result<String> {
        self.blocking("current_url", self.action_timeout, |tab| Ok(tab.get_url()))
            .await
    }

    async fn evaluate_json(&self, script: &str) -> Result<serde_json::Value> {
        let script = script.to_string();
        self.blocking("evaluate", self.action_timeout, move |tab| {
            let remote = tab
                .evaluate(&script, false)
                .map_err(|e| OasisError::Network(format!("Script evaluation failed: {e}")))?;
            let raw = remote
                .value
                .and_then(|v| v.as_str().map(str::to_string))
                .ok_or_else(|| {
                    OasisError::Serialization("Collector returned no JSON string".to_string())
                })?;
            serde_json::from_str(&raw)
                .map_err(|e| OasisError::Serialization(format!("Collector JSON invalid: {e}")))
        })
        .await
    }

    async fn click_link(&self, text: &str) -> Result<()> {
        let literal = Self::xpath_literal(text);
        self.click_by_xpath(
            "click_link",
            format!("//a[normalize-space(.)='{literal}']"),
        )
        .await
    }

    async fn click_menu_item(&self, text: &str) -> Result<()> {
        let literal = Self::xpath_literal(text);
        self.click_by_xpath(
            "click_menu_item",
            format!(
                "//nav//li[normalize-space(.)='{literal}'] | //ul//li[normalize-space(.)='{literal}'] | //*[@role='menuitem'][normalize-space(.)='{literal}']"
            ),
        )
        .await
    }

    async fn click_button(&self, text: &str) -> Result<()> {
        let literal = Self::xpath_literal(text);
        self.click_by_xpath(
            "click_button",
            format!(
                "//button[normalize-space(.)='{literal}'] | //input[@type='submit' or @type='button'][@value='{literal}']"
            ),
        )
        .await
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let selector = selector.to_string();
        let value = value.to_string();
        self.blocking("fill_field", self.action_timeout, move |tab| {
            let element = tab
                .find_element(&selector)
                .map_err(|e| OasisError::Network(format!("Field not found: {e}")))?;
            element
                .click()
                .map_err(|e| OasisError::Network(format!("Focus failed: {e}")))?;
            element
                .type_into(&value)
                .map_err(|e| OasisError::Network(format!("Typing failed: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        // Option selection goes through the DOM so change handlers fire
        let script = format!(
            r#"(function() {{
                var el = document.querySelector({selector});
                if (!el) return JSON.stringify({{ok: false}});
                var match = Array.from(el.options).find(function(o) {{
                    return o.text.trim() === {value} || o.value === {value};
                }});
                if (!match) return JSON.stringify({{ok: false}});
                el.value = match.value;
                el.dispatchEvent(new Event('change', {{bubbles: true}}));
                return JSON.stringify({{ok: true}});
            }})()"#,
            selector = serde_json::to_string(selector).unwrap_or_default(),
            value = serde_json::to_string(value).unwrap_or_default(),
        );

        let result = self.evaluate_json(&script).await?;
        if result.get("ok").and_then(|v| v.as_bool()) == Some(true) {
            Ok(())
        } else {
            Err(OasisError::Network(format!(
                "Option '{value}' not found in {selector}"
            )))
        }
    }

    async fn wait_for_settle(&self) -> Result<()> {
        let result = self
            .blocking("settle", self.settle_timeout, |tab| {
                // Failure here usually means no navigation happened, which is fine
                let _ = tab.wait_until_navigated();
                Ok(())
            })
            .await;
        // Give late XHR-driven rendering a moment before snapshotting
        tokio::time::sleep(Duration::from_millis(400)).await;
        result
    }

    async fn go_back(&self) -> Result<()> {
        let script = "(function() { history.back(); return JSON.stringify({ok: true}); })()"
            .to_string();
        self.evaluate_json(&script).await?;
        self.wait_for_settle().await
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.blocking("screenshot", self.action_timeout, |tab| {
            tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|e| OasisError::Session(format!("Screenshot failed: {e}")))
        })
        .await
    }

    async fn cookies(&self) -> Result<Vec<CookieSnapshot>> {
        self.blocking("cookies", self.action_timeout, |tab| {
            let cookies = tab
                .get_cookies()
                .map_err(|e| OasisError::Session(format!("Cookie read failed: {e}")))?;
            Ok(cookies
                .into_iter()
                .map(|c| CookieSnapshot {
                    name: c.name,
                    domain: c.domain,
                    path: c.path,
                    secure: c.secure,
                    http_only: c.http_only,
                })
                .collect())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let browser = self.browser.lock().map(|mut b| b.take()).unwrap_or(None);
        if let Some(browser) = browser {
            // Dropping the handle kills the process; do it off the runtime
            let _ = tokio::task::spawn_blocking(move || drop(browser)).await;
            tracing::debug!("Browser session closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_literal_strips_quotes() {
        assert_eq!(ChromeDriver::xpath_literal("Submit Claim"), "Submit Claim");
        assert_eq!(ChromeDriver::xpath_literal("O'Brien \"x\""), "OBrien x");
    }
}
