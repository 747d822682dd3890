//! Shared auth guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route loaders and the navigation hook should apply identical
//! unauthenticated-redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::app::ENTRY_ROUTE;
use crate::state::auth::AuthStore;

/// Whether a loader may proceed.
///
/// Checks the session snapshot first, then the persisted token directly. The
/// second check covers a navigation that races a login whose store update
/// has not been observed yet.
pub fn has_session(session: &AuthStore) -> bool {
    session.snapshot().is_authenticated() || session.persisted_token().is_some()
}

/// Redirect target for an unauthenticated loader, or `None` to proceed.
pub fn require_session(session: &AuthStore, redirect_to: &str) -> Option<String> {
    if has_session(session) {
        return None;
    }
    tracing::debug!(%redirect_to, "no session, redirecting");
    Some(redirect_to.to_owned())
}

/// Navigation hook run before any route resolves.
///
/// The entry route is public; every other path needs an authenticated
/// session snapshot. Returns the redirect target when access is denied.
pub fn guard_navigation(session: &AuthStore, path: &str) -> Option<&'static str> {
    if path == ENTRY_ROUTE || session.snapshot().is_authenticated() {
        None
    } else {
        Some(ENTRY_ROUTE)
    }
}
