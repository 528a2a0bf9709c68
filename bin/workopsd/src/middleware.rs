//! Unified request gate.
//!
//! One middleware handles both surfaces:
//!
//! - **Pages** (`/`, `/login`, `/dashboard`): an authenticated caller
//!   on an auth page is sent to the dashboard; an unauthenticated
//!   caller on a protected page is sent to the login page with the
//!   stale cookie cleared. The decision depends only on whether the
//!   token verified and which class the page is in.
//! - **API**: the token comes from the `Authorization: Bearer` header
//!   or the `access_token` cookie. A missing or invalid token is a 401;
//!   a role outside the route table's allow-list is a 403. Valid claims
//!   are inserted as a request extension for handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};

use workops_auth::api::{clear_cookie, ACCESS_TOKEN_COOKIE};
use workops_auth::guard::{GuardDecision, RouteTable};
use workops_auth::service::AuthService;
use workops_core::ServiceError;

/// Shared state for the gate middleware.
#[derive(Clone)]
pub struct GateContext {
    pub auth: Arc<AuthService>,
    pub table: Arc<RouteTable>,
}

/// How a path is treated by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login-flow page; authenticated users are bounced to the dashboard.
    AuthPage,
    /// Page requiring a valid session.
    ProtectedPage,
    /// API endpoint reachable without a token.
    PublicApi,
    /// Everything else: API endpoint requiring a valid token.
    Api,
}

pub fn classify(path: &str) -> RouteClass {
    match path {
        "/" | "/login" => RouteClass::AuthPage,
        "/dashboard" => RouteClass::ProtectedPage,
        "/health" | "/version" | "/auth/google" | "/auth/callback/google" => RouteClass::PublicApi,
        _ => RouteClass::Api,
    }
}

/// Outcome of the page gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageGate {
    ToDashboard,
    ToLogin,
    Pass,
}

/// The page redirect decision. Two inputs, nothing else.
pub fn page_gate(class: RouteClass, authenticated: bool) -> PageGate {
    match (class, authenticated) {
        (RouteClass::AuthPage, true) => PageGate::ToDashboard,
        (RouteClass::ProtectedPage, false) => PageGate::ToLogin,
        _ => PageGate::Pass,
    }
}

/// Extract the access token: `Authorization: Bearer` wins, then the
/// `access_token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    let cookies = headers.get(COOKIE).and_then(|v| v.to_str().ok())?;
    cookie_value(cookies, ACCESS_TOKEN_COOKIE)
}

fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        if k == name && !v.is_empty() {
            Some(v.to_string())
        } else {
            None
        }
    })
}

pub async fn auth_gate(State(ctx): State<GateContext>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().as_str().to_string();
    let class = classify(&path);

    if class == RouteClass::PublicApi {
        return next.run(req).await;
    }

    let claims = extract_token(req.headers())
        .and_then(|token| ctx.auth.verify_token(&token).ok());

    match class {
        RouteClass::AuthPage | RouteClass::ProtectedPage => {
            match page_gate(class, claims.is_some()) {
                PageGate::ToDashboard => Redirect::to("/dashboard").into_response(),
                PageGate::ToLogin => (
                    AppendHeaders([(SET_COOKIE, clear_cookie())]),
                    Redirect::to("/login"),
                )
                    .into_response(),
                PageGate::Pass => next.run(req).await,
            }
        }
        _ => {
            let claims = match claims {
                Some(claims) => claims,
                None => {
                    return ServiceError::Unauthorized("missing or invalid token".into())
                        .into_response()
                }
            };

            match ctx.table.check(&method, &path, claims.role) {
                GuardDecision::Forbidden => {
                    tracing::warn!(%path, %method, role = %claims.role, user = %claims.sub, "role refused");
                    ServiceError::PermissionDenied(format!("{} is not allowed here", claims.role))
                        .into_response()
                }
                GuardDecision::Allowed | GuardDecision::NoRule => {
                    req.extensions_mut().insert(claims);
                    next.run(req).await
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_classify() {
        assert_eq!(classify("/"), RouteClass::AuthPage);
        assert_eq!(classify("/login"), RouteClass::AuthPage);
        assert_eq!(classify("/dashboard"), RouteClass::ProtectedPage);
        assert_eq!(classify("/health"), RouteClass::PublicApi);
        assert_eq!(classify("/auth/callback/google"), RouteClass::PublicApi);
        assert_eq!(classify("/auth/me"), RouteClass::Api);
        assert_eq!(classify("/request/requests"), RouteClass::Api);
    }

    #[test]
    fn test_page_gate_matrix() {
        assert_eq!(page_gate(RouteClass::AuthPage, true), PageGate::ToDashboard);
        assert_eq!(page_gate(RouteClass::AuthPage, false), PageGate::Pass);
        assert_eq!(page_gate(RouteClass::ProtectedPage, true), PageGate::Pass);
        assert_eq!(page_gate(RouteClass::ProtectedPage, false), PageGate::ToLogin);
    }

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-a"));
        headers.insert(
            COOKIE,
            HeaderValue::from_static("access_token=tok-b; theme=dark"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("tok-a"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=tok-c"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("tok-c"));
    }

    #[test]
    fn test_extract_token_absent() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(extract_token(&headers), None);
    }
}
