mod attendance;

use std::sync::Arc;

use axum::Router;

use crate::service::LunchService;

/// Shared application state for lunch handlers.
pub type AppState = Arc<LunchService>;

/// Build the lunch router. Mounted under `/launch`.
pub fn build_router(svc: Arc<LunchService>) -> Router {
    attendance::routes().with_state(svc)
}
