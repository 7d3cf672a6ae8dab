//! Shared application state for all routes. Built once per process.

use crate::repository::SimpleRepository;
use crate::service::{ServiceMetrics, SimpleService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn SimpleService>,
    /// Gateway handle used by `GET /ready`.
    pub repo: Arc<dyn SimpleRepository>,
    /// Present when the service is instrumented.
    pub metrics: Option<Arc<ServiceMetrics>>,
}
