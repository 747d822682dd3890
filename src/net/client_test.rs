use super::*;
use crate::test_helpers::{MockFetch, logged_in_app, test_app};
use crate::util::navigate::HistoryNavigator;
use serde_json::json;

fn unauthorized() -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::json(401, &json!({ "detail": "Token expired" })))
}

// =============================================================================
// headers
// =============================================================================

#[test]
fn auth_headers_include_bearer_when_logged_in() {
    let app = logged_in_app(MockFetch::new());
    let headers = app.ctx.api().client().auth_headers();
    assert_eq!(
        headers,
        vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("Authorization".to_owned(), "Bearer tok-123".to_owned()),
        ]
    );
}

#[test]
fn auth_headers_omit_bearer_when_anonymous() {
    let app = test_app(MockFetch::new());
    let headers = app.ctx.api().client().auth_headers();
    assert_eq!(headers, vec![("Content-Type".to_owned(), "application/json".to_owned())]);
}

#[test]
fn auth_headers_omit_bearer_without_storage() {
    let session = Arc::new(AuthStore::new(None));
    session.login("tok");
    let client = ApiClient::new(MockFetch::new(), session, Arc::new(HistoryNavigator::new()));
    assert!(
        client
            .auth_headers()
            .iter()
            .all(|(k, _)| k != "Authorization")
    );
}

#[test]
fn auth_headers_omit_bearer_for_empty_token() {
    let app = test_app(MockFetch::new());
    app.ctx.session.login("");
    let headers = app.ctx.api().client().auth_headers();
    assert_eq!(headers, vec![("Content-Type".to_owned(), "application/json".to_owned())]);
}

#[tokio::test]
async fn request_options_override_default_headers() {
    let app = logged_in_app(MockFetch::new());
    let options = RequestOptions::default()
        .with_header("content-type", "text/plain")
        .with_header("X-Trace", "abc");
    app.ctx
        .api()
        .client()
        .get("http://api.test/ventures/", options)
        .await
        .unwrap();

    let request = &app.fetch.requests()[0];
    assert_eq!(request.header("Content-Type"), Some("text/plain"));
    assert_eq!(request.header("X-Trace"), Some("abc"));
    assert_eq!(request.header("Authorization"), Some("Bearer tok-123"));
    assert_eq!(request.headers.len(), 3);
}

#[tokio::test]
async fn post_and_put_send_json_bodies() {
    let app = logged_in_app(MockFetch::new());
    let client = app.ctx.api().client().clone();
    client
        .post("http://api.test/a/", &json!({ "a": 1 }), RequestOptions::default())
        .await
        .unwrap();
    client
        .put("http://api.test/b/", &json!({ "b": 2 }), RequestOptions::default())
        .await
        .unwrap();

    let requests = app.fetch.requests();
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].body.as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(requests[1].method, Method::Put);
    assert_eq!(requests[1].body.as_deref(), Some(r#"{"b":2}"#));
}

// =============================================================================
// 401 handling
// =============================================================================

#[tokio::test]
async fn unauthorized_get_logs_out_and_redirects_once() {
    let app = logged_in_app(MockFetch::replying(vec![unauthorized()]));
    let response = app
        .ctx
        .api()
        .client()
        .get("http://api.test/ventures/", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!app.ctx.session.snapshot().is_authenticated());
    assert_eq!(app.store.removals(), 1);
    assert_eq!(app.navigator.visited(), vec!["/".to_owned()]);
}

#[tokio::test]
async fn unauthorized_post_and_put_each_redirect_once() {
    for method in [Method::Post, Method::Put] {
        let app = logged_in_app(MockFetch::replying(vec![unauthorized()]));
        let client = app.ctx.api().client().clone();
        let url = "http://api.test/ventures/chat/";
        let body = json!({ "question": "hi" });
        let response = match method {
            Method::Post => client.post(url, &body, RequestOptions::default()).await,
            _ => client.put(url, &body, RequestOptions::default()).await,
        };

        assert_eq!(response.unwrap().status, 401);
        assert_eq!(app.store.removals(), 1, "{method}");
        assert_eq!(app.navigator.visited(), vec!["/".to_owned()], "{method}");
        assert!(!app.ctx.session.snapshot().is_authenticated());
    }
}

#[tokio::test]
async fn non_401_errors_leave_session_alone() {
    let app = logged_in_app(MockFetch::replying(vec![Ok(HttpResponse::new(403, "{}"))]));
    app.ctx
        .api()
        .client()
        .get("http://api.test/ventures/", RequestOptions::default())
        .await
        .unwrap();

    assert!(app.ctx.session.snapshot().is_authenticated());
    assert_eq!(app.store.removals(), 0);
    assert!(app.navigator.visited().is_empty());
}

#[tokio::test]
async fn unauthenticated_post_ignores_401() {
    let app = logged_in_app(MockFetch::replying(vec![unauthorized()]));
    let response = app
        .ctx
        .api()
        .client()
        .post_unauthenticated("http://api.test/auth/login", &json!({}), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(app.ctx.session.snapshot().is_authenticated());
    assert_eq!(app.store.removals(), 0);
    assert!(app.navigator.visited().is_empty());
    assert_eq!(app.fetch.requests()[0].header("Authorization"), None);
}

#[tokio::test]
async fn transport_errors_propagate_without_side_effects() {
    let app = logged_in_app(MockFetch::replying(vec![Err(ApiError::Transport("connection refused".to_owned()))]));
    let err = app
        .ctx
        .api()
        .client()
        .get("http://api.test/ventures/", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(app.ctx.session.snapshot().is_authenticated());
    assert!(app.navigator.visited().is_empty());
}

// =============================================================================
// merge_headers
// =============================================================================

#[test]
fn merge_headers_replaces_case_insensitively_in_place() {
    let merged = merge_headers(
        vec![("Content-Type".to_owned(), "application/json".to_owned())],
        vec![("CONTENT-TYPE".to_owned(), "text/csv".to_owned())],
    );
    assert_eq!(merged, vec![("Content-Type".to_owned(), "text/csv".to_owned())]);
}
