pub mod attendance;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use workops_sql::{RecordError, SQLStore};

/// Lunch service error type.
#[derive(Debug, Error)]
pub enum LunchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<RecordError> for LunchError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(m) => LunchError::NotFound(m),
            // UNIQUE(user_id, date) races resolve as storage errors;
            // the upsert path re-reads before writing.
            RecordError::Conflict(m) => LunchError::Storage(m),
            RecordError::Storage(m) => LunchError::Storage(m),
            RecordError::Encode(m) => LunchError::Internal(m),
        }
    }
}

impl From<LunchError> for workops_core::ServiceError {
    fn from(e: LunchError) -> Self {
        match e {
            LunchError::NotFound(m) => workops_core::ServiceError::NotFound(m),
            LunchError::Validation(m) => workops_core::ServiceError::Validation(m),
            LunchError::Storage(m) => workops_core::ServiceError::Storage(m),
            LunchError::Internal(m) => workops_core::ServiceError::Internal(m),
        }
    }
}

/// The Lunch service. Holds the SQL store.
pub struct LunchService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl LunchService {
    /// Create a new LunchService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, LunchError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }
}
