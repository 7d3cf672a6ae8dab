//! Router assembly.

mod common;
mod docs;
mod simple;

pub use common::common_routes_with_ready;
pub use docs::docs_routes;
pub use simple::simple_routes;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected with 413 by the body extractors.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application: entity, docs and operational routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(simple_routes(state.clone()))
        .merge(docs_routes())
        .merge(common_routes_with_ready(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
