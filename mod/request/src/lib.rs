//! Request module — service/supply tickets.
//!
//! Employees file a ticket (an ISSUE to fix or SUPPLIES to order),
//! admins assign and move it through an enforced status lifecycle.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use workops_core::Module;

use crate::service::RequestService;

/// Request module implementing the Module trait. Mounted under `/request`.
pub struct RequestModule {
    service: Arc<RequestService>,
}

impl RequestModule {
    pub fn new(service: Arc<RequestService>) -> Self {
        Self { service }
    }
}

impl Module for RequestModule {
    fn name(&self) -> &str {
        "request"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
