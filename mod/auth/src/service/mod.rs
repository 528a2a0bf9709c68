pub mod oauth;
pub mod schema;
pub mod session;
pub mod user;

use std::sync::Arc;

use thiserror::Error;

use workops_sql::{RecordError, SQLStore};

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<RecordError> for AuthError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(m) => AuthError::NotFound(m),
            RecordError::Conflict(m) => AuthError::Conflict(m),
            RecordError::Storage(m) => AuthError::Storage(m),
            RecordError::Encode(m) => AuthError::Internal(m),
        }
    }
}

impl From<AuthError> for workops_core::ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => workops_core::ServiceError::NotFound(m),
            AuthError::Conflict(m) => workops_core::ServiceError::Conflict(m),
            AuthError::Validation(m) => workops_core::ServiceError::Validation(m),
            AuthError::Unauthorized(m) => workops_core::ServiceError::Unauthorized(m),
            AuthError::Storage(m) => workops_core::ServiceError::Storage(m),
            AuthError::Internal(m) => workops_core::ServiceError::Internal(m),
        }
    }
}

/// Google OAuth configuration, read from the server's `[google]` section.
#[derive(Debug, Clone, Default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered with Google, e.g.
    /// `http://localhost:8080/auth/callback/google`.
    pub redirect_url: String,

    /// Token endpoint override; unset uses Google's published endpoint.
    pub token_url: Option<String>,

    /// Userinfo endpoint override; unset uses Google's published endpoint.
    pub userinfo_url: Option<String>,
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
    /// Google OAuth client settings.
    pub google: GoogleConfig,
    /// A user created or found with this email is promoted to SUPER_ADMIN.
    pub super_admin_email: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "workops-dev-secret-change-me".to_string(),
            access_token_ttl: 86400, // 24h
            google: GoogleConfig::default(),
            super_admin_email: None,
        }
    }
}

/// The Auth service. Holds the SQL store and configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }
}
