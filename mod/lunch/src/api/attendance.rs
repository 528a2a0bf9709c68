use axum::extract::{Extension, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use workops_auth::model::Claims;
use workops_core::{today_ymd, ServiceError};

use crate::api::AppState;
use crate::model::MarkAttendance;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", post(mark_attendance))
        .route("/attendance-summary", get(attendance_summary))
}

/// POST /launch/attendance — mark the caller's attendance for a day.
async fn mark_attendance(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<MarkAttendance>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let attendance = svc
        .mark_attendance(&claims.sub, &claims.name, body)
        .map_err(ServiceError::from)?;
    serde_json::to_value(attendance)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

#[derive(serde::Deserialize)]
struct SummaryParams {
    #[serde(default)]
    date: Option<String>,
}

/// GET /launch/attendance-summary?date=YYYY-MM-DD — daily headcounts.
/// Guarded: ADMIN, SUPER_ADMIN. Defaults to today.
async fn attendance_summary(
    State(svc): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let date = params.date.unwrap_or_else(today_ymd);
    let summary = svc.attendance_summary(&date).map_err(ServiceError::from)?;
    serde_json::to_value(summary)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}
