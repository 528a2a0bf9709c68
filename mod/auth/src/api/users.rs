use axum::extract::{Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};

use workops_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::UpdateRoleRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees))
        .route("/admin", get(list_admins))
        .route("/update-role", patch(update_role))
}

/// GET /user/employees — list all users. Guarded: ADMIN, SUPER_ADMIN.
async fn list_employees(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_users(&params).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

/// GET /user/admin — list ADMIN/SUPER_ADMIN users. Guarded: SUPER_ADMIN.
async fn list_admins(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_admin_users(&params).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

/// PATCH /user/update-role — set a user's role. Guarded: SUPER_ADMIN.
async fn update_role(
    State(svc): State<AppState>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc
        .update_role(&body.user_id, body.role)
        .map_err(ServiceError::from)?;
    serde_json::to_value(user)
        .map(Json)
        .map_err(|e| ServiceError::Internal(e.to_string()))
}
