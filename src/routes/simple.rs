//! SimpleObject CRUD routes under /example/simple.

use crate::handlers::simple::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn simple_routes(state: AppState) -> Router {
    Router::new()
        .route("/example/simple", get(list).post(create))
        .route(
            "/example/simple/:id",
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
