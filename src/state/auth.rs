//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the request client (for the bearer token), route loaders (for the
//! auth guard), and the navigation hook. Only `login` and `logout` mutate it.
//!
//! DESIGN
//! ======
//! State lives in a `watch` channel: `snapshot` is a synchronous one-shot
//! read, `subscribe` hands out a receiver for hosts that re-render on change.
//! Every mutation replaces the whole value, so readers never see a token
//! without the matching `is_authenticated` flag.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::util::storage::{AUTH_TOKEN_KEY, KeyValueStore};

/// Authentication state. `is_authenticated` is true exactly when a token is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    token: Option<String>,
    user: Option<serde_json::Value>,
    is_authenticated: bool,
}

impl SessionState {
    /// The logged-out state.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in state; the user record is filled in lazily, if ever.
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()), user: None, is_authenticated: true }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&serde_json::Value> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }
}

/// Process-wide session holder.
pub struct AuthStore {
    state: watch::Sender<SessionState>,
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl AuthStore {
    /// Create the store, seeding it from a persisted token when one exists.
    ///
    /// A persisted token is trusted as-is; the first 401 from the backend is
    /// what eventually clears a stale one.
    pub fn new(storage: Option<Arc<dyn KeyValueStore>>) -> Self {
        let initial = storage
            .as_deref()
            .and_then(|s| s.get_item(AUTH_TOKEN_KEY))
            .filter(|token| !token.is_empty())
            .map_or_else(SessionState::anonymous, SessionState::authenticated);
        if initial.is_authenticated() {
            tracing::debug!("session restored from storage");
        }
        let (state, _) = watch::channel(initial);
        Self { state, storage }
    }

    /// Whether the host supplied a persistence backend.
    #[must_use]
    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Persist `token` and mark the session authenticated.
    pub fn login(&self, token: &str) {
        if let Some(storage) = &self.storage {
            storage.set_item(AUTH_TOKEN_KEY, token);
        }
        self.replace(SessionState::authenticated(token));
        tracing::info!("session started");
    }

    /// Drop the persisted token and reset to the anonymous state.
    pub fn logout(&self) {
        if let Some(storage) = &self.storage {
            storage.remove_item(AUTH_TOKEN_KEY);
        }
        if self.replace(SessionState::anonymous()) {
            tracing::info!("session ended");
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change after this call.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Token read straight from the persistence backend, bypassing the
    /// in-memory state.
    #[must_use]
    pub fn persisted_token(&self) -> Option<String> {
        self.storage
            .as_deref()?
            .get_item(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Swap in `next`, notifying subscribers only on an actual change.
    fn replace(&self, next: SessionState) -> bool {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        })
    }
}
