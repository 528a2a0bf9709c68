mod requests;

use std::sync::Arc;

use axum::Router;

use crate::service::RequestService;

/// Shared application state for request handlers.
pub type AppState = Arc<RequestService>;

/// Build the request router. Mounted under `/request`.
pub fn build_router(svc: Arc<RequestService>) -> Router {
    requests::routes().with_state(svc)
}
