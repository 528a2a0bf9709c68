mod me;
mod oauth;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state for auth handlers.
pub type AppState = Arc<AuthService>;

/// Cookie carrying the access token. Set by the OAuth callback, cleared
/// on logout and on failed verification at the page gate.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Build the auth router. Mounted under `/auth`.
pub fn auth_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(oauth::routes())
        .merge(me::routes())
        .with_state(svc)
}

/// Build the user-administration router. Mounted under `/user`.
pub fn user_router(svc: Arc<AuthService>) -> Router {
    users::routes().with_state(svc)
}

/// Build the `Set-Cookie` value carrying a fresh access token.
pub fn access_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ACCESS_TOKEN_COOKIE, token, max_age_secs
    )
}

/// Build the `Set-Cookie` value that deletes the access token cookie.
pub fn clear_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        ACCESS_TOKEN_COOKIE
    )
}
