//! Simple service: CRUD REST endpoints for `SimpleObject` with generated API docs.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError};
pub use model::{SimpleId, SimpleObject};
pub use openapi::{api_doc, ApiDoc};
pub use repository::{MemorySimpleRepository, PgSimpleRepository, SimpleRepository, SimpleTransaction};
pub use routes::{app, common_routes_with_ready, docs_routes, simple_routes};
pub use service::{build_service, seed_samples, BuiltService, SimpleService, SimpleServiceImpl};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};

use std::sync::Arc;

/// State over the given gateway with the decorators selected by `config`.
pub fn build_state(repo: Arc<dyn SimpleRepository>, config: &ServerConfig) -> AppState {
    let BuiltService { service, metrics } = build_service(repo.clone(), config);
    AppState { service, repo, metrics }
}
