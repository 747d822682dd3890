use super::*;
use crate::net::fetch::HttpResponse;
use crate::test_helpers::{MockFetch, logged_in_app, test_app};
use crate::util::storage::{AUTH_TOKEN_KEY, KeyValueStore};
use serde_json::json;

#[test]
fn validate_credentials_trims_username() {
    assert_eq!(validate_credentials("  alice ", "pw"), Ok(("alice".to_owned(), "pw".to_owned())));
}

#[test]
fn validate_credentials_requires_both_fields() {
    assert_eq!(validate_credentials("   ", "pw"), Err("Enter both username and password."));
    assert_eq!(validate_credentials("alice", ""), Err("Enter both username and password."));
}

#[tokio::test]
async fn sign_in_starts_session_with_access_token() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(200, &json!({ "access": "a-1", "refresh": "r-1" })))]);
    let app = test_app(fetch);

    let tokens = sign_in(&app.ctx, "alice", "pw").await.unwrap();
    assert_eq!(tokens.refresh.as_deref(), Some("r-1"));
    assert_eq!(app.ctx.session.snapshot().token(), Some("a-1"));
    assert_eq!(app.store.get_item(AUTH_TOKEN_KEY), Some("a-1".to_owned()));
}

#[tokio::test]
async fn sign_in_failure_keeps_session_anonymous() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(400, &json!({ "detail": "Invalid credentials" })))]);
    let app = test_app(fetch);

    let err = sign_in(&app.ctx, "alice", "bad").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!app.ctx.session.snapshot().is_authenticated());
}

#[tokio::test]
async fn refresh_session_replaces_token() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(200, &json!({ "access": "fresh" })))]);
    let app = logged_in_app(fetch);

    refresh_session(&app.ctx, "r-1").await.unwrap();
    assert_eq!(app.ctx.session.snapshot().token(), Some("fresh"));
}

#[tokio::test]
async fn sign_up_does_not_start_session() {
    let fetch = MockFetch::replying(vec![Ok(HttpResponse::json(201, &json!({ "username": "bob" })))]);
    let app = test_app(fetch);

    let user = sign_up(&app.ctx, "bob", "pw", "bob@example.com").await.unwrap();
    assert_eq!(user["username"], "bob");
    assert!(!app.ctx.session.snapshot().is_authenticated());
}

#[test]
fn sign_out_clears_session_and_navigates_to_entry() {
    let app = logged_in_app(MockFetch::new());
    sign_out(&app.ctx);
    assert!(!app.ctx.session.snapshot().is_authenticated());
    assert_eq!(app.navigator.last().as_deref(), Some("/"));
}
