//! Documentation routes: /docs redirect, Swagger UI page, OpenAPI JSON.

use crate::handlers::docs::{openapi_json, redirect, swagger_ui, API_DOCS_PATH, SWAGGER_UI_PATH};
use axum::{routing::get, Router};

pub fn docs_routes() -> Router {
    Router::new()
        .route("/docs", get(redirect))
        .route("/docs/", get(redirect))
        .route(SWAGGER_UI_PATH, get(swagger_ui))
        .route(API_DOCS_PATH, get(openapi_json))
}
