//! Wire DTOs for the venture backend.
//!
//! DESIGN
//! ======
//! Venture records stay opaque JSON: the client only inspects the pagination
//! envelope around them. Envelope fields tolerate `null` and absence because
//! the views render whatever arrives.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-defined venture record, passed through untouched.
pub type VentureRecord = serde_json::Value;

/// Page-number pagination envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    /// Total records across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    /// Absolute URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

/// Portfolio-level figures shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_ventures: i64,
    pub active_ventures: i64,
    pub total_burn_rate: i64,
    pub avg_runway: i64,
}

/// Filters and paging for `GET /ventures/`.
///
/// Unset and empty values are left out of the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VentureQuery {
    pub page: Option<u64>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub pod: Option<String>,
    pub stage: Option<String>,
    pub status: Option<String>,
    pub ordering: Option<String>,
}

impl VentureQuery {
    /// Query pairs in a stable order, with empty values dropped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("search", &self.search),
            ("pod", &self.pod),
            ("stage", &self.stage),
            ("status", &self.status),
            ("ordering", &self.ordering),
        ];

        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        for (key, value) in text {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_owned()));
            }
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}

/// Tokens issued by `/auth/login` and `/auth/refresh/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Bearer token for API calls.
    #[serde(alias = "token")]
    pub access: String,
    /// Long-lived token accepted by `/auth/refresh/`.
    #[serde(default)]
    pub refresh: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
