//! Lunch module — daily attendance headcounts.
//!
//! Each user marks whether they are in for lunch on a given day and
//! their meal preference; admins read the daily summary for catering.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use workops_core::Module;

use crate::service::LunchService;

/// Lunch module implementing the Module trait. Mounted under `/launch`.
pub struct LunchModule {
    service: Arc<LunchService>,
}

impl LunchModule {
    pub fn new(service: Arc<LunchService>) -> Self {
        Self { service }
    }
}

impl Module for LunchModule {
    // The public API prefix is /launch, not /lunch.
    fn name(&self) -> &str {
        "launch"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
