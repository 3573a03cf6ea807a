//! Session control
//!
//! Browser session lifecycle: launch, authenticate, capture cookies,
//! teardown. Authentication failure is fatal and never retried.

pub mod controller;
pub mod cookies;

pub use controller::{PortalSession, SessionController};
pub use cookies::SessionMechanism;
