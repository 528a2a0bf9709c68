use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;

use workops_core::ServiceError;

use crate::api::{access_cookie, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/google", get(google_login))
        .route("/callback/google", get(google_callback))
}

/// GET /auth/google — redirect into Google's authorization flow.
async fn google_login(State(svc): State<AppState>) -> Result<Redirect, ServiceError> {
    let state = workops_core::new_id();
    let url = svc.google_authorize_url(&state).map_err(ServiceError::from)?;
    Ok(Redirect::temporary(&url))
}

/// GET /auth/callback/google?code=... — exchange the code, find or
/// create the user, set the access token cookie and land on the
/// dashboard.
async fn google_callback(
    State(svc): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let info = svc
        .google_callback(&params.code)
        .await
        .map_err(ServiceError::from)?;

    let user = svc
        .find_or_create_google_user(&info)
        .map_err(ServiceError::from)?;

    let tokens = svc.issue_token(&user).map_err(ServiceError::from)?;

    Ok((
        AppendHeaders([(SET_COOKIE, access_cookie(&tokens.access_token, tokens.expires_in))]),
        Redirect::to("/dashboard"),
    ))
}

#[derive(serde::Deserialize)]
struct CallbackParams {
    code: String,
    #[allow(dead_code)]
    #[serde(default)]
    state: String,
}
