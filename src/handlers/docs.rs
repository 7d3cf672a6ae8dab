//! API documentation: redirect, Swagger UI page, and the generated OpenAPI JSON.

use crate::openapi::api_doc;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};

pub const SWAGGER_UI_PATH: &str = "/swagger-ui.html";
pub const API_DOCS_PATH: &str = "/v2/api-docs";

const SWAGGER_UI_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Visian-Bank API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/v2/api-docs", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// GET /docs: 302 to the Swagger UI page.
pub async fn redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, SWAGGER_UI_PATH)])
}

/// GET /swagger-ui.html
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// GET /v2/api-docs
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc())
}
