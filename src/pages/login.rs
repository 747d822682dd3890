//! Login, registration and sign-out flows for the entry route.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use serde_json::Value;

use crate::app::{AppContext, ENTRY_ROUTE};
use crate::net::error::ApiError;
use crate::net::types::AuthTokens;

/// Trim and check login form input.
///
/// # Errors
///
/// Returns a user-facing message when a field is blank.
pub fn validate_credentials(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Authenticate and start a session with the issued access token.
///
/// # Errors
///
/// Returns the login request's error; the session is left untouched.
pub async fn sign_in(ctx: &AppContext, username: &str, password: &str) -> Result<AuthTokens, ApiError> {
    let tokens = ctx.api().login(username, password).await?;
    ctx.session.login(&tokens.access);
    tracing::info!(%username, "signed in");
    Ok(tokens)
}

/// Create an account. Does not sign in.
///
/// # Errors
///
/// Returns the registration request's error.
pub async fn sign_up(ctx: &AppContext, username: &str, password: &str, email: &str) -> Result<Value, ApiError> {
    ctx.api().register(username, password, email).await
}

/// Swap the session token for a freshly issued one.
///
/// # Errors
///
/// Returns the refresh request's error; the current session is kept.
pub async fn refresh_session(ctx: &AppContext, refresh: &str) -> Result<AuthTokens, ApiError> {
    let tokens = ctx.api().refresh_token(refresh).await?;
    ctx.session.login(&tokens.access);
    Ok(tokens)
}

/// End the session and return to the entry route.
pub fn sign_out(ctx: &AppContext) {
    ctx.session.logout();
    ctx.navigator.navigate(ENTRY_ROUTE);
}
