pub mod request;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use workops_sql::{RecordError, SQLStore};

/// Request service error type.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<RecordError> for RequestError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(m) => RequestError::NotFound(m),
            RecordError::Conflict(m) => RequestError::Conflict(m),
            RecordError::Storage(m) => RequestError::Storage(m),
            RecordError::Encode(m) => RequestError::Internal(m),
        }
    }
}

impl From<RequestError> for workops_core::ServiceError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::NotFound(m) => workops_core::ServiceError::NotFound(m),
            RequestError::Conflict(m) => workops_core::ServiceError::Conflict(m),
            RequestError::Validation(m) => workops_core::ServiceError::Validation(m),
            RequestError::PermissionDenied(m) => workops_core::ServiceError::PermissionDenied(m),
            RequestError::Storage(m) => workops_core::ServiceError::Storage(m),
            RequestError::Internal(m) => workops_core::ServiceError::Internal(m),
        }
    }
}

/// The Request service. Holds the SQL store.
pub struct RequestService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl RequestService {
    /// Create a new RequestService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, RequestError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }
}
