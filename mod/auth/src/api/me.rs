use axum::extract::{Extension, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};

use workops_core::ServiceError;

use crate::api::{clear_cookie, AppState};
use crate::model::Claims;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
}

/// GET /auth/me — current user info from JWT claims.
async fn me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&claims.sub).map_err(ServiceError::from)?;
    serde_json::to_value(user)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// POST /auth/logout — revoke the session and clear the cookie.
async fn logout(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ServiceError> {
    svc.revoke_session(&claims.sid).map_err(ServiceError::from)?;
    Ok((
        AppendHeaders([(SET_COOKIE, clear_cookie())]),
        StatusCode::NO_CONTENT,
    ))
}
