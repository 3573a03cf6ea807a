//! Browser session lifecycle
//!
//! Owns launch, authentication, cookie capture, and teardown. Any failure
//! before the post-login check is authentication-fatal: the portal locks
//! accounts on repeated bad attempts, so there is deliberately no retry
//! anywhere in this module.

use super::cookies::{self, SessionMechanism};
use crate::adapters::browser::{ChromeDriver, CookieSnapshot, PortalDriver};
use crate::config::PortalConfig;
use crate::core::analyze;
use crate::core::extract::fields;
use crate::core::navigate::{plan, NavigationGoal};
use crate::domain::{OasisError, Result};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

/// An authenticated portal session
///
/// The driver handle is owned here and borrowed out to components for the
/// duration of a run; nothing else keeps a reference to the browser.
pub struct PortalSession {
    driver: Arc<dyn PortalDriver>,

    /// Session mechanism classified from the captured cookies
    pub mechanism: SessionMechanism,

    /// Read-only cookie snapshot taken right after login
    pub cookies: Vec<CookieSnapshot>,

    pub opened_at: DateTime<Utc>,
}

impl PortalSession {
    /// The driven browser, borrowed for the duration of a call.
    pub fn driver(&self) -> &dyn PortalDriver {
        self.driver.as_ref()
    }
}

/// Opens and closes portal sessions
pub struct SessionController {
    config: PortalConfig,
}

impl SessionController {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Opens an authenticated session against the configured portal.
    ///
    /// Probes reachability first (no browser is launched for a dead
    /// portal), then launches an isolated browser context, logs in, and
    /// captures the cookie set.
    ///
    /// # Errors
    ///
    /// [`OasisError::Network`] when the portal is unreachable;
    /// [`OasisError::Authentication`] for every failure from login-page
    /// load to credential verification. Authentication errors are fatal
    /// and must not be retried.
    pub async fn open(&self) -> Result<PortalSession> {
        self.preflight().await?;

        let driver = ChromeDriver::launch(&self.config).await?;
        self.open_with_driver(Arc::new(driver)).await
    }

    /// Runs the login flow on an already-launched driver.
    ///
    /// Split out so scripted drivers can exercise the identical flow.
    pub async fn open_with_driver(&self, driver: Arc<dyn PortalDriver>) -> Result<PortalSession> {
        let auth = |step: &str, e: OasisError| {
            OasisError::Authentication(format!("{step}: {e}"))
        };

        driver
            .navigate(&self.config.base_url)
            .await
            .map_err(|e| auth("login page unreachable", e))?;

        let structure = analyze::analyze(driver.as_ref()).await?;

        let password_field = fields::find_field(&structure, &fields::PASSWORD);

        match password_field {
            Some(password_field) => {
                let username_field = fields::find_field(&structure, &fields::USERNAME)
                    .ok_or_else(|| {
                        OasisError::Authentication("no username field on login page".to_string())
                    })?;

                driver
                    .fill_field(&username_field.selector, &self.config.username)
                    .await
                    .map_err(|e| auth("username entry failed", e))?;

                // The only point where the password leaves its wrapper
                driver
                    .fill_field(
                        &password_field.selector,
                        self.config.password.expose_secret().as_ref(),
                    )
                    .await
                    .map_err(|e| auth("password entry failed", e))?;

                let login = fields::find_login_button(&structure).ok_or_else(|| {
                    OasisError::Authentication("no login control on login page".to_string())
                })?;
                driver
                    .click_button(&login)
                    .await
                    .map_err(|e| auth("credential submission failed", e))?;

                if let Err(e) = driver.wait_for_settle().await {
                    tracing::debug!(error = %e, "Settle after login did not complete");
                }

                // Verification: the login form must be gone
                let after = analyze::analyze(driver.as_ref()).await?;
                if fields::find_field(&after, &fields::PASSWORD).is_some() {
                    self.teardown(driver.as_ref()).await;
                    return Err(OasisError::Authentication(
                        "portal rejected the credentials".to_string(),
                    ));
                }
            }
            None => {
                // No password field: either an already-live session or a
                // page we don't understand. A logout affordance decides.
                if plan(&structure, &NavigationGoal::Logout).is_none() {
                    self.teardown(driver.as_ref()).await;
                    return Err(OasisError::Authentication(
                        "login form not found on portal entry page".to_string(),
                    ));
                }
                tracing::info!("Existing portal session still live, skipping login");
            }
        }

        let cookie_snapshot = driver.cookies().await.unwrap_or_default();
        let mechanism = cookies::classify(&cookie_snapshot);

        tracing::info!(
            mechanism = ?mechanism,
            cookie_count = cookie_snapshot.len(),
            "Portal session established"
        );

        Ok(PortalSession {
            driver,
            mechanism,
            cookies: cookie_snapshot,
            opened_at: Utc::now(),
        })
    }

    /// Closes a session. Idempotent and infallible: teardown failures are
    /// logged, never raised, so cleanup paths can always call this.
    pub async fn close(&self, session: &PortalSession) {
        self.teardown(session.driver()).await;
    }

    async fn teardown(&self, driver: &dyn PortalDriver) {
        if let Err(e) = driver.close().await {
            tracing::warn!(error = %e, "Browser teardown reported an error");
        }
    }

    /// Cheap reachability probe before a browser is spent on the portal.
    async fn preflight(&self) -> Result<()> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .timeout(Duration::from_secs(self.config.navigation_timeout_secs))
            .build()
            .map_err(|e| OasisError::Network(format!("probe client: {e}")))?;

        let response = client
            .get(&self.config.base_url)
            .send()
            .await
            .map_err(|e| OasisError::Network(format!("portal unreachable: {e}")))?;

        tracing::debug!(status = %response.status(), "Portal reachability probe");
        Ok(())
    }
}
