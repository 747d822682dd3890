//! Authenticated request client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call except login/register/refresh goes through the
//! authenticated methods here. They attach the session's bearer token and,
//! on a 401, end the session and send the user back to the entry route.
//! That happens whether or not the caller looks at the response.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use serde::Serialize;

use crate::app::ENTRY_ROUTE;
use crate::state::auth::AuthStore;
use crate::util::navigate::Navigator;

use super::error::ApiError;
use super::fetch::{Fetch, HttpRequest, HttpResponse, Method};

const UNAUTHORIZED: u16 = 401;

/// Per-call extras layered over the default headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    fetch: Arc<dyn Fetch>,
    session: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(fetch: Arc<dyn Fetch>, session: Arc<AuthStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { fetch, session, navigator }
    }

    /// Default headers for an authenticated call.
    ///
    /// The bearer header is only added when the host has a persistence
    /// backend; a pre-render context never sends credentials.
    #[must_use]
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        let mut headers = json_headers();
        if self.session.has_storage() {
            if let Some(token) = self
                .session
                .snapshot()
                .token()
                .filter(|t| !t.is_empty())
            {
                headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
            }
        }
        headers
    }

    /// # Errors
    ///
    /// Returns an error only if the request could not be sent.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        self.send_authenticated(Method::Get, url, None, options)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded or the request could not be sent.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let body = encode_body(body)?;
        self.send_authenticated(Method::Post, url, Some(body), options)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded or the request could not be sent.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let body = encode_body(body)?;
        self.send_authenticated(Method::Put, url, Some(body), options)
            .await
    }

    /// POST without credentials and without 401 handling, for the auth
    /// endpoints that run before a session exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded or the request could not be sent.
    pub async fn post_unauthenticated<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let body = encode_body(body)?;
        let request = HttpRequest {
            method: Method::Post,
            url: url.to_owned(),
            headers: merge_headers(json_headers(), options.headers),
            body: Some(body),
        };
        tracing::debug!(method = %request.method, url = %request.url, "request");
        self.fetch.fetch(request).await
    }

    async fn send_authenticated(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url: url.to_owned(),
            headers: merge_headers(self.auth_headers(), options.headers),
            body,
        };
        tracing::debug!(%method, %url, "request");
        let response = self.fetch.fetch(request).await?;
        self.handle_unauthorized(&response);
        Ok(response)
    }

    fn handle_unauthorized(&self, response: &HttpResponse) {
        if response.status != UNAUTHORIZED {
            return;
        }
        tracing::warn!("unauthorized response, ending session");
        self.session.logout();
        self.navigator.navigate(ENTRY_ROUTE);
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("Content-Type".to_owned(), "application/json".to_owned())]
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Apply `extra` over `base`; a same-named header (case-insensitive) replaces
/// the base value in place.
pub(crate) fn merge_headers(mut base: Vec<(String, String)>, extra: Vec<(String, String)>) -> Vec<(String, String)> {
    for (name, value) in extra {
        match base.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value,
            None => base.push((name, value)),
        }
    }
    base
}
