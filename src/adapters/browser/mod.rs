//! Browser driver adapters
//!
//! The pipeline never touches a browser API directly; everything goes
//! through the [`PortalDriver`] trait. Two implementations:
//!
//! - [`ChromeDriver`] - drives a headless Chrome process (live runs)
//! - [`ScriptedDriver`] - replays canned page snapshots (tests, rehearsal)

pub mod chrome;
pub mod driver;
pub mod scripted;

pub use chrome::ChromeDriver;
pub use driver::{CookieSnapshot, PortalDriver};
pub use scripted::{ScriptedDriver, ScriptedDriverBuilder, ScriptedPage};
