//! SimpleObject CRUD handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Fetch all SimpleObject entities.
#[utoipa::path(
    get,
    path = "/example/simple",
    tag = "simple",
    responses((status = 200, description = "All stored objects", body = [SimpleObject]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SimpleObject>>, AppError> {
    let rows = state.service.find_all().await?;
    Ok(Json(rows))
}

/// Fetch one SimpleObject by id. Absent ids yield 404 with an empty body.
#[utoipa::path(
    get,
    path = "/example/simple/{id}",
    tag = "simple",
    params(("id" = i64, Path, description = "SimpleObject identifier")),
    responses(
        (status = 200, description = "Object found", body = SimpleObject),
        (status = 404, description = "No object with this id")
    )
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<SimpleId>) -> Result<Response, AppError> {
    Ok(match state.service.find_one(id).await? {
        Some(row) => (StatusCode::OK, Json(row)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Create a SimpleObject. The body must not carry an id.
#[utoipa::path(
    post,
    path = "/example/simple",
    tag = "simple",
    request_body = SimpleObject,
    responses(
        (status = 201, description = "Object created", body = SimpleObject),
        (status = 409, description = "Body carried an id")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SimpleObject>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let row = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Replace the text of an existing SimpleObject. The path id wins; a conflicting body id is rejected.
#[utoipa::path(
    put,
    path = "/example/simple/{id}",
    tag = "simple",
    params(("id" = i64, Path, description = "SimpleObject identifier")),
    request_body = SimpleObject,
    responses(
        (status = 200, description = "Object updated", body = SimpleObject),
        (status = 400, description = "Body id differs from path id"),
        (status = 404, description = "No object with this id")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<SimpleId>,
    payload: Result<Json<SimpleObject>, JsonRejection>,
) -> Result<Json<SimpleObject>, AppError> {
    let Json(mut body) = payload?;
    if let Some(body_id) = body.id {
        if body_id != id {
            return Err(AppError::BadRequest(format!(
                "body id {} does not match path id {}",
                body_id, id
            )));
        }
    }
    body.id = Some(id);
    let row = state.service.update(body).await?;
    Ok(Json(row))
}

/// Delete a SimpleObject. Deleting an absent id still returns 204.
#[utoipa::path(
    delete,
    path = "/example/simple/{id}",
    tag = "simple",
    params(("id" = i64, Path, description = "SimpleObject identifier")),
    responses((status = 204, description = "Object removed or already absent"))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<SimpleId>) -> Result<StatusCode, AppError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
