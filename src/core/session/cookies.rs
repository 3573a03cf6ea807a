//! Cookie snapshot classification
//!
//! After login the captured cookie names are used to classify the
//! portal's session mechanism for diagnostics. Names only; values never
//! leave the browser.

use crate::adapters::browser::CookieSnapshot;
use serde::{Deserialize, Serialize};

/// How the portal appears to track the authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMechanism {
    /// Classic server-side session cookie
    CookieBased,
    /// Token (JWT/bearer) carried in a cookie
    TokenBased,
    /// Nothing recognizable captured
    Unknown,
}

const TOKEN_MARKERS: &[&str] = &["token", "jwt", "bearer", "auth"];
const SESSION_MARKERS: &[&str] = &[
    "jsessionid",
    "phpsessid",
    "asp.net_sessionid",
    "sessionid",
    "session",
];

/// Classifies the session mechanism from cookie names.
///
/// Token markers win over session markers: a portal that sets both a
/// session id and a JWT is driving authorization off the token.
pub fn classify(cookies: &[CookieSnapshot]) -> SessionMechanism {
    let names: Vec<String> = cookies.iter().map(|c| c.name.to_lowercase()).collect();

    if names
        .iter()
        .any(|n| TOKEN_MARKERS.iter().any(|m| n.contains(m)))
    {
        SessionMechanism::TokenBased
    } else if names
        .iter()
        .any(|n| SESSION_MARKERS.iter().any(|m| n.contains(m)))
    {
        SessionMechanism::CookieBased
    } else {
        SessionMechanism::Unknown
    }
}
