//! Error type for REST calls against the venture backend.
//!
//! ERROR HANDLING
//! ==============
//! `Http` displays only the server-provided message so route loaders can hand
//! `to_string()` straight to the view without re-formatting.

/// Errors produced by the request client and API helpers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A request URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request body could not be serialized to JSON.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The request never produced a response (connect, DNS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A success response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
