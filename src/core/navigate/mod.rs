//! Navigation strategist
//!
//! Reaches named goals in the portal through an ordered strategy list
//! (direct link, menu item, button), recording which strategy worked.

pub mod goal;
pub mod strategist;

pub use goal::NavigationGoal;
pub use strategist::{plan, plan_strategy, reach, NavigationStep, NavigationTrace, Strategy};
