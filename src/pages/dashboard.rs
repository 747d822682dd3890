//! Dashboard loader.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated landing route. Pulls the whole portfolio in one request so
//! the view can chart it without paging.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::Arc;

use serde::Serialize;

use crate::app::{AppContext, ENTRY_ROUTE};
use crate::net::fetch::Fetch;
use crate::net::types::{DashboardMetrics, VentureQuery, VentureRecord};
use crate::util::auth::require_session;

use super::LoadOutcome;

/// Page size large enough to mean "everything".
pub const DASHBOARD_PAGE_SIZE: u32 = 1000;

/// Where anonymous visitors are sent.
pub const DASHBOARD_REDIRECT: &str = ENTRY_ROUTE;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardData {
    pub ventures: Vec<VentureRecord>,
    pub metrics: DashboardMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Load dashboard data with `fetch`.
///
/// Metrics are always the zeroed placeholder; the view computes its own
/// figures from `ventures`.
pub async fn load(ctx: &AppContext, fetch: Arc<dyn Fetch>) -> LoadOutcome<DashboardData> {
    if let Some(target) = require_session(&ctx.session, DASHBOARD_REDIRECT) {
        return LoadOutcome::Redirect(target);
    }

    let query = VentureQuery { page_size: Some(DASHBOARD_PAGE_SIZE), ..VentureQuery::default() };
    let data = match ctx.api_with(fetch).get_ventures(&query).await {
        Ok(page) => DashboardData { ventures: page.results, metrics: DashboardMetrics::default(), error: None },
        Err(e) => {
            tracing::error!(error = %e, "dashboard load failed");
            DashboardData { ventures: Vec::new(), metrics: DashboardMetrics::default(), error: Some(e.to_string()) }
        }
    };
    LoadOutcome::Render(data)
}
