//! OpenAPI document for the public routes, generated with utoipa.

use crate::handlers::simple;
use crate::model::SimpleObject;
use utoipa::OpenApi;

/// Path prefix of the routes included in the document.
pub const DOCUMENTED_PREFIX: &str = "/example/";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visian-Bank",
        version = "0.0.1",
        contact(name = "visiansystems.com", url = "https://visiansystems.com")
    ),
    paths(simple::list, simple::read, simple::create, simple::update, simple::delete),
    components(schemas(SimpleObject)),
    tags((name = "simple", description = "SimpleObject CRUD"))
)]
pub struct ApiDoc;

/// Generated document restricted to routes under `DOCUMENTED_PREFIX`.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.paths.paths.retain(|path, _| path.starts_with(DOCUMENTED_PREFIX));
    doc
}
