//! REST API helpers for the venture backend.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Http` carrying the server's `detail`
//! or `error` field, falling back to `HTTP <status>`. 401 side effects were
//! already applied by the request client before this layer sees the response.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::client::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::fetch::HttpResponse;
use super::types::{AuthTokens, DashboardMetrics, Paginated, VentureQuery, VentureRecord};

/// Batch size used when the caller does not ask for a specific count.
pub const DEFAULT_GENERATE_COUNT: u32 = 20;

/// Absolute endpoint URLs derived from the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub ventures: String,
    pub ventures_metrics: String,
    pub ventures_chat: String,
    pub ventures_generate_random: String,
    pub auth_login: String,
    pub auth_refresh: String,
    pub auth_register: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            ventures: format!("{base}/ventures/"),
            ventures_metrics: format!("{base}/ventures/metrics/"),
            ventures_chat: format!("{base}/ventures/chat/"),
            ventures_generate_random: format!("{base}/ventures/generate_random/"),
            auth_login: format!("{base}/auth/login"),
            auth_refresh: format!("{base}/auth/refresh/"),
            auth_register: format!("{base}/auth/register/"),
        }
    }
}

/// Append `query` to `endpoint`.
///
/// # Errors
///
/// Returns an error if `endpoint` is not an absolute URL.
pub fn ventures_url(endpoint: &str, query: &VentureQuery) -> Result<String, ApiError> {
    let mut url = reqwest::Url::parse(endpoint).map_err(|e| ApiError::InvalidUrl(format!("{endpoint}: {e}")))?;
    let pairs = query.to_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url.to_string())
}

/// Message for a failed response body.
fn error_message(status: u16, body: &str) -> String {
    let parsed: Value = serde_json::from_str(body).unwrap_or_else(|_| json!({}));
    ["detail", "error"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(message_text))
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Render a message field. Null, `false`, `0` and `""` count as absent;
/// structured values (field error lists, objects) are rendered as JSON.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON) => None,
        other => Some(other.to_string()),
    }
}

/// Turn a raw response into `T`, or into an error carrying the server message.
///
/// # Errors
///
/// Returns [`ApiError::Http`] for non-2xx statuses and [`ApiError::Parse`]
/// when a success body is not valid JSON for `T`.
pub fn handle_api_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(ApiError::Http { status: response.status, message: error_message(response.status, &response.body) });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Typed endpoint wrappers over an [`ApiClient`].
#[derive(Clone)]
pub struct VenturesApi {
    client: ApiClient,
    endpoints: Endpoints,
}

impl VenturesApi {
    pub fn new(client: ApiClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// `GET /ventures/` with filters and paging.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn get_ventures(&self, query: &VentureQuery) -> Result<Paginated<VentureRecord>, ApiError> {
        let url = ventures_url(&self.endpoints.ventures, query)?;
        let response = self
            .client
            .get(&url, RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// `GET /ventures/metrics/`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn get_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        let response = self
            .client
            .get(&self.endpoints.ventures_metrics, RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// Ask the portfolio assistant a question.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn chat(&self, question: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(&self.endpoints.ventures_chat, &json!({ "question": question }), RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// Have the backend create `count` random ventures.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn generate_random(&self, count: u32) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(&self.endpoints.ventures_generate_random, &json!({ "count": count }), RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// Exchange credentials for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let body = json!({ "username": username, "password": password });
        let response = self
            .client
            .post_unauthenticated(&self.endpoints.auth_login, &body, RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn refresh_token(&self, refresh: &str) -> Result<AuthTokens, ApiError> {
        let response = self
            .client
            .post_unauthenticated(&self.endpoints.auth_refresh, &json!({ "refresh": refresh }), RequestOptions::default())
            .await?;
        handle_api_response(response)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a malformed body.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<Value, ApiError> {
        let body = json!({ "username": username, "password": password, "email": email });
        let response = self
            .client
            .post_unauthenticated(&self.endpoints.auth_register, &body, RequestOptions::default())
            .await?;
        handle_api_response(response)
    }
}
