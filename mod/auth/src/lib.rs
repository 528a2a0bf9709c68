//! Auth module — Google-federated login, JWT sessions, users and roles.
//!
//! # Resources
//!
//! - **User** — identity created on first Google login, carries the role
//!   (EMPLOYEE / ADMIN / SUPER_ADMIN) that gates every route
//! - **Session** — JWT issuance record, revoked on logout
//!
//! # Usage
//!
//! ```ignore
//! use workops_auth::{AuthModule, UserModule, service::AuthConfig};
//!
//! let service = AuthService::new(sql, AuthConfig::default())?;
//! let auth = AuthModule::new(service.clone());   // mount under /auth
//! let users = UserModule::new(service);          // mount under /user
//! ```

pub mod api;
pub mod guard;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use workops_core::Module;

use crate::service::AuthService;

/// Auth module: login flow, current-user and logout endpoints.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::auth_router(self.service.clone())
    }
}

/// User module: listing and role administration endpoints.
pub struct UserModule {
    service: Arc<AuthService>,
}

impl UserModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

impl Module for UserModule {
    fn name(&self) -> &str {
        "user"
    }

    fn routes(&self) -> Router {
        api::user_router(self.service.clone())
    }
}
