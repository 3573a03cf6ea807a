//! Ordered-strategy navigation
//!
//! For each goal the strategist tries, in order: a direct link whose text
//! matches the goal vocabulary, then a menu/list item, then a button.
//! Each strategy is attempted fully before falling to the next; the first
//! success wins and the winning strategy is recorded in the trace so
//! fixtures can assert on *how* a goal was reached, not just that it was.
//!
//! Adding or reordering strategies is a data change here, not a
//! control-flow rewrite elsewhere.

use super::goal::NavigationGoal;
use crate::adapters::browser::PortalDriver;
use crate::core::analyze::{self, PageStructure};
use crate::domain::errors::NavigationError;
use crate::domain::Result;
use serde::{Deserialize, Serialize};

/// How a navigation step was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A link whose visible text matched
    DirectLink,
    /// A menu/list item whose text matched
    MenuItem,
    /// A button whose text matched
    Button,
}

impl Strategy {
    /// The fixed priority order.
    pub fn ordered() -> [Strategy; 3] {
        [Strategy::DirectLink, Strategy::MenuItem, Strategy::Button]
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::DirectLink => "direct-link",
            Strategy::MenuItem => "menu-item",
            Strategy::Button => "button",
        };
        write!(f, "{s}")
    }
}

/// One planned (and possibly executed) navigation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    /// Which strategy produced the step
    pub strategy: Strategy,

    /// Exact visible text of the element to act on
    pub target_text: String,

    /// Human-readable trace entry, e.g. `"Clicked: Submit Claim"`
    pub action: String,
}

/// Record of how a goal was reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationTrace {
    pub goal: String,
    pub steps: Vec<NavigationStep>,
}

fn matches_term(text: &str, term: &str) -> bool {
    let text = text.trim().to_lowercase();
    let term = term.trim().to_lowercase();
    !text.is_empty() && text.contains(&term)
}

/// Plans a step for one specific strategy, without executing anything.
pub fn plan_strategy(
    structure: &PageStructure,
    goal: &NavigationGoal,
    strategy: Strategy,
) -> Option<NavigationStep> {
    let vocabulary = goal.vocabulary();

    let target: Option<String> = match strategy {
        Strategy::DirectLink => vocabulary.iter().find_map(|term| {
            structure
                .links
                .iter()
                .find(|l| matches_term(&l.text, term))
                .map(|l| l.text.clone())
        }),
        Strategy::MenuItem => vocabulary.iter().find_map(|term| {
            structure
                .menu_items
                .iter()
                .find(|m| matches_term(&m.text, term))
                .map(|m| m.text.clone())
        }),
        Strategy::Button => vocabulary.iter().find_map(|term| {
            structure
                .buttons
                .iter()
                .find(|b| matches_term(&b.text, term))
                .map(|b| b.text.clone())
        }),
    };

    target.map(|text| NavigationStep {
        strategy,
        action: format!("Clicked: {text}"),
        target_text: text,
    })
}

/// Plans the first step the ordered strategy list yields. Pure.
pub fn plan(structure: &PageStructure, goal: &NavigationGoal) -> Option<NavigationStep> {
    Strategy::ordered()
        .into_iter()
        .find_map(|strategy| plan_strategy(structure, goal, strategy))
}

async fn execute(driver: &dyn PortalDriver, step: &NavigationStep) -> Result<()> {
    match step.strategy {
        Strategy::DirectLink => driver.click_link(&step.target_text).await,
        Strategy::MenuItem => driver.click_menu_item(&step.target_text).await,
        Strategy::Button => driver.click_button(&step.target_text).await,
    }
}

/// Reaches a goal from the current page.
///
/// Tries each strategy in order; a strategy that plans a step but fails to
/// execute it is logged and the next strategy gets its turn. When nothing
/// works, the currently visible link texts are captured into the error for
/// diagnostics.
///
/// # Errors
///
/// Returns [`NavigationError::NoPathToGoal`] when no strategy succeeds.
/// Recoverable at the batch level; fatal for this specific sub-goal.
pub async fn reach(driver: &dyn PortalDriver, goal: &NavigationGoal) -> Result<NavigationTrace> {
    let structure = analyze::analyze(driver).await?;

    for strategy in Strategy::ordered() {
        let Some(step) = plan_strategy(&structure, goal, strategy) else {
            continue;
        };

        match execute(driver, &step).await {
            Ok(()) => {
                // Settle failures are tolerated; the next snapshot decides
                if let Err(e) = driver.wait_for_settle().await {
                    tracing::debug!(error = %e, "Settle after navigation step failed");
                }
                tracing::info!(
                    goal = %goal.label(),
                    strategy = %step.strategy,
                    action = %step.action,
                    "Navigation step succeeded"
                );
                return Ok(NavigationTrace {
                    goal: goal.label(),
                    steps: vec![step],
                });
            }
            Err(e) => {
                tracing::warn!(
                    goal = %goal.label(),
                    strategy = %strategy,
                    target = %step.target_text,
                    error = %e,
                    "Navigation step failed, falling to next strategy"
                );
            }
        }
    }

    let visible_links = structure.link_texts();
    tracing::warn!(
        goal = %goal.label(),
        visible_links = ?visible_links,
        "No navigation strategy reached the goal"
    );

    Err(NavigationError::NoPathToGoal {
        goal: goal.label(),
        visible_links,
    }
    .into())
}
