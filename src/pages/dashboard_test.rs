use super::*;
use crate::net::error::ApiError;
use crate::net::fetch::HttpResponse;
use crate::test_helpers::{MockFetch, TEST_BASE_URL, logged_in_app, test_app};
use crate::util::storage::{AUTH_TOKEN_KEY, KeyValueStore};
use serde_json::json;

#[tokio::test]
async fn anonymous_user_is_redirected_before_any_request() {
    let app = test_app(MockFetch::new());
    let outcome = load(&app.ctx, app.fetch.clone()).await;
    assert_eq!(outcome, LoadOutcome::Redirect("/".to_owned()));
    assert_eq!(app.fetch.call_count(), 0);
}

#[tokio::test]
async fn persisted_token_lets_load_proceed() {
    let app = test_app(MockFetch::new());
    app.store.set_item(AUTH_TOKEN_KEY, "written-by-login-page");

    let outcome = load(&app.ctx, app.fetch.clone()).await;
    assert!(matches!(outcome, LoadOutcome::Render(_)));
    assert_eq!(app.fetch.call_count(), 1);
}

#[tokio::test]
async fn loads_all_ventures_with_zeroed_metrics() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(
        200,
        &json!({ "count": 2, "results": [{ "id": 1 }, { "id": 2 }] }),
    ))]);
    let app = logged_in_app(fetch);

    let data = load(&app.ctx, app.fetch.clone())
        .await
        .into_data()
        .unwrap();
    assert_eq!(data.ventures, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
    assert_eq!(data.metrics, DashboardMetrics::default());
    assert_eq!(data.error, None);
    assert_eq!(app.fetch.requests()[0].url, format!("{TEST_BASE_URL}/ventures/?page_size=1000"));
}

#[tokio::test]
async fn unreachable_backend_yields_empty_shape_with_error() {
    let fetch = MockFetch::replying(vec![Err(ApiError::Transport("connection refused".to_owned()))]);
    let app = logged_in_app(fetch);

    let data = load(&app.ctx, app.fetch.clone())
        .await
        .into_data()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&data).unwrap(),
        json!({
            "ventures": [],
            "metrics": { "total_ventures": 0, "active_ventures": 0, "total_burn_rate": 0, "avg_runway": 0 },
            "error": "request failed: connection refused"
        })
    );
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(500, &json!({ "error": "db down" })))]);
    let app = logged_in_app(fetch);

    let data = load(&app.ctx, app.fetch.clone())
        .await
        .into_data()
        .unwrap();
    assert_eq!(data.error.as_deref(), Some("db down"));
    assert!(data.ventures.is_empty());
}

#[tokio::test]
async fn expired_token_ends_session_and_reports_error() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(401, &json!({ "detail": "Token expired" })))]);
    let app = logged_in_app(fetch);

    let data = load(&app.ctx, app.fetch.clone())
        .await
        .into_data()
        .unwrap();
    assert_eq!(data.error.as_deref(), Some("Token expired"));
    assert!(!app.ctx.session.snapshot().is_authenticated());
    assert_eq!(app.navigator.visited(), vec!["/".to_owned()]);
}
