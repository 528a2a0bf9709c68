use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use workops_auth::model::Claims;
use workops_core::ServiceError;

use crate::api::AppState;
use crate::model::{AssignRequest, CreateRequest, RequestListQuery, UpdateStatusRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(create_request).get(list_requests))
        .route("/analytics", get(analytics))
        .route("/{id}", get(get_request).delete(delete_request))
        .route("/{id}/assign", post(assign_request))
        .route("/{id}/status", post(update_status))
        .route("/{id}/reopen", post(reopen_request))
}

/// POST /request/requests — file a new ticket owned by the caller.
async fn create_request(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = svc
        .create_request(&claims.sub, body)
        .map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /request/requests — list tickets. Employees only see their own;
/// admins may filter by any user.
async fn list_requests(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(mut query): Query<RequestListQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    if !claims.role.is_admin() {
        query.user_id = Some(claims.sub.clone());
    }
    let result = svc.list_requests(&query).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

/// GET /request/{id} — fetch one ticket. Employees only see their own.
async fn get_request(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let request = svc.get_request(&id).map_err(ServiceError::from)?;
    if !claims.role.is_admin() && request.user_id != claims.sub {
        return Err(ServiceError::PermissionDenied(
            "not the owner of this request".into(),
        ));
    }
    serde_json::to_value(request)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// DELETE /request/{id} — remove a ticket. Guarded: ADMIN, SUPER_ADMIN.
async fn delete_request(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_request(&id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /request/{id}/assign — hand a ticket to a user. Guarded:
/// ADMIN, SUPER_ADMIN.
async fn assign_request(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let request = svc
        .assign_request(&id, &body.assigned_to_id)
        .map_err(ServiceError::from)?;
    serde_json::to_value(request)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// POST /request/{id}/status — move a ticket through its lifecycle.
/// Guarded: ADMIN, SUPER_ADMIN.
async fn update_status(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let request = svc
        .update_status(&id, body.status, body.rejection_reason)
        .map_err(ServiceError::from)?;
    serde_json::to_value(request)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// POST /request/{id}/reopen — put a settled ticket back in PENDING.
/// Employees may only reopen their own tickets.
async fn reopen_request(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    if !claims.role.is_admin() {
        let request = svc.get_request(&id).map_err(ServiceError::from)?;
        if request.user_id != claims.sub {
            return Err(ServiceError::PermissionDenied(
                "not the owner of this request".into(),
            ));
        }
    }
    let request = svc.reopen_request(&id).map_err(ServiceError::from)?;
    serde_json::to_value(request)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// GET /request/analytics — ticket counts by status and type. Guarded:
/// ADMIN, SUPER_ADMIN.
async fn analytics(State(svc): State<AppState>) -> Result<Json<serde_json::Value>, ServiceError> {
    let stats = svc.analytics().map_err(ServiceError::from)?;
    serde_json::to_value(stats)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}
