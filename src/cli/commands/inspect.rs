//! Inspect command implementation
//!
//! Authenticates, navigates to a goal or URL, and dumps the page's
//! structural snapshot. This is how the portal's page structure gets
//! documented without reading the pipeline's logs.

use crate::config::load_config;
use crate::core::analyze;
use crate::core::navigate::{self, NavigationGoal};
use crate::core::session::SessionController;
use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Navigation goal to reach first: claim-search, rejections
    #[arg(long, conflicts_with = "url")]
    pub goal: Option<String>,

    /// Absolute URL to inspect instead of a goal
    #[arg(long)]
    pub url: Option<String>,

    /// Emit JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;

        let controller = SessionController::new(config.portal.clone());
        let session = match controller.open().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Could not open portal session");
                eprintln!("Failed to open portal session: {e}");
                return Ok(4);
            }
        };

        let outcome = self.inspect(&session).await;

        controller.close(&session).await;

        match outcome {
            Ok(rendered) => {
                match &self.output {
                    Some(path) => {
                        tokio::fs::write(path, rendered).await?;
                        println!("Snapshot written to {path}");
                    }
                    None => println!("{rendered}"),
                }
                Ok(0)
            }
            Err(e) => {
                eprintln!("Inspection failed: {e}");
                Ok(5)
            }
        }
    }

    async fn inspect(
        &self,
        session: &crate::core::session::PortalSession,
    ) -> anyhow::Result<String> {
        let driver = session.driver();

        if let Some(url) = &self.url {
            driver.navigate(url).await?;
        } else if let Some(goal) = &self.goal {
            let goal = match goal.as_str() {
                "claim-search" => NavigationGoal::ClaimSearch,
                "rejections" => NavigationGoal::RejectionList,
                other => anyhow::bail!("unknown goal '{other}', try claim-search or rejections"),
            };
            let trace = navigate::reach(driver, &goal).await?;
            for step in &trace.steps {
                tracing::info!(strategy = %step.strategy, action = %step.action, "Step");
            }
        }

        let structure = analyze::analyze(driver).await?;

        if self.json {
            Ok(serde_json::to_string_pretty(&structure)?)
        } else {
            Ok(analyze::to_markdown(&structure))
        }
    }
}
