//! Route-level data loaders.
//!
//! ARCHITECTURE
//! ============
//! Each page module owns one route's pre-render load: guard on the session,
//! fetch, reshape for the view. Loaders never fail; failures become an
//! `error` field next to empty data.

use serde::Serialize;

pub mod dashboard;
pub mod login;
pub mod venture_list;

/// Result of running a loader.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LoadOutcome<T> {
    /// Data for the view.
    Render(T),
    /// The user must be sent elsewhere before anything renders.
    Redirect(String),
}

impl<T> LoadOutcome<T> {
    /// Page data, or `None` for a redirect.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Render(data) => Some(data),
            Self::Redirect(_) => None,
        }
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Render(_) => None,
            Self::Redirect(path) => Some(path.as_str()),
        }
    }
}
