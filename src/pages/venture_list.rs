//! Venture list loader: filtered, paginated browsing.
//!
//! SYSTEM CONTEXT
//! ==============
//! Filters live in the route URL (`?page=2&pod=...`) so list views are
//! linkable. They are forwarded verbatim; the backend owns validation.

#[cfg(test)]
#[path = "venture_list_test.rs"]
mod venture_list_test;

use std::sync::Arc;

use reqwest::Url;
use serde::Serialize;

use crate::app::AppContext;
use crate::net::fetch::Fetch;
use crate::net::types::{VentureQuery, VentureRecord};
use crate::util::auth::require_session;

use super::LoadOutcome;

/// Backend page size; only used to derive the page count.
pub const PAGE_SIZE: u64 = 20;

pub const DEFAULT_ORDERING: &str = "-last_update";

/// Where anonymous visitors are sent.
///
/// Differs from the dashboard's target (`/`); both are kept as observed
/// until the routing table settles on one login path.
pub const VENTURE_LIST_REDIRECT: &str = "/login";

/// Filter values echoed back so the view can pre-fill its controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VentureFilters {
    pub search: String,
    pub pod: String,
    pub stage: String,
    pub status: String,
    pub ordering: String,
}

impl Default for VentureFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            pod: String::new(),
            stage: String::new(),
            status: String::new(),
            ordering: DEFAULT_ORDERING.to_owned(),
        }
    }
}

impl VentureFilters {
    /// Read filters from the route URL. Missing values are empty strings,
    /// except `ordering` which falls back to [`DEFAULT_ORDERING`].
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let ordering = query_param(url, "ordering");
        Self {
            search: query_param(url, "search"),
            pod: query_param(url, "pod"),
            stage: query_param(url, "stage"),
            status: query_param(url, "status"),
            ordering: if ordering.is_empty() { DEFAULT_ORDERING.to_owned() } else { ordering },
        }
    }

    fn to_query(&self, page: u64) -> VentureQuery {
        VentureQuery {
            page: Some(page),
            page_size: None,
            search: Some(self.search.clone()),
            pod: Some(self.pod.clone()),
            stage: Some(self.stage.clone()),
            status: Some(self.status.clone()),
            ordering: Some(self.ordering.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub current_page: u64,
    pub total_pages: u64,
}

impl Pagination {
    fn empty() -> Self {
        Self { count: 0, next: None, previous: None, current_page: 1, total_pages: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VentureListData {
    pub ventures: Vec<VentureRecord>,
    pub pagination: Pagination,
    pub filters: VentureFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Number of pages needed for `count` records.
#[must_use]
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Requested page number; anything missing or non-positive reads as 1.
///
/// Unlike the text filters, `page` is normalized before it is forwarded: the
/// view needs a number for `currentPage`, and the request sends that same
/// number so the two never disagree.
#[must_use]
pub fn requested_page(url: &Url) -> u64 {
    query_param(url, "page")
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

fn query_param(url: &Url, name: &str) -> String {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Load one page of ventures for the filters in `url`.
pub async fn load(ctx: &AppContext, fetch: Arc<dyn Fetch>, url: &Url) -> LoadOutcome<VentureListData> {
    if let Some(target) = require_session(&ctx.session, VENTURE_LIST_REDIRECT) {
        return LoadOutcome::Redirect(target);
    }

    let page = requested_page(url);
    let filters = VentureFilters::from_url(url);

    let data = match ctx
        .api_with(fetch)
        .get_ventures(&filters.to_query(page))
        .await
    {
        Ok(result) => VentureListData {
            pagination: Pagination {
                count: result.count,
                next: result.next,
                previous: result.previous,
                current_page: page,
                total_pages: total_pages(result.count, PAGE_SIZE),
            },
            ventures: result.results,
            filters,
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, page, "venture list load failed");
            VentureListData {
                ventures: Vec::new(),
                pagination: Pagination::empty(),
                filters: VentureFilters::default(),
                error: Some(e.to_string()),
            }
        }
    };
    LoadOutcome::Render(data)
}
