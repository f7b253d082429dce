//! services/api/src/web/classes.rs
//!
//! Axum handlers for the `/classes` resource.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    response::Json,
};
use class_tracker_core::{NewClass, ValidationError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::{ClassResponse, CreateClassRequest, ErrorResponse, SuccessResponse};
use crate::web::state::AppState;

/// List every class with its items.
#[utoipa::path(
    get,
    path = "/classes",
    responses(
        (status = 200, description = "All classes, oldest first", body = [ClassResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_classes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = app_state.classes.list_classes().await?;
    Ok(Json(classes.into_iter().map(ClassResponse::from).collect()))
}

/// Create a class. The name is sanitized and must be unique.
#[utoipa::path(
    post,
    path = "/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 200, description = "Class created", body = ClassResponse),
        (status = 400, description = "Missing name, or empty after sanitization", body = ErrorResponse),
        (status = 409, description = "A class with this name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_class_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateClassRequest>, JsonRejection>,
) -> Result<Json<ClassResponse>, ApiError> {
    let Json(req) = payload?;
    let name = req.name.ok_or(ValidationError::Missing("name"))?;
    let new_class = NewClass::new(&name)?;

    let class = app_state.classes.create_class(new_class).await?;
    info!(class_id = %class.id, name = %class.name, "Created class");

    Ok(Json(ClassResponse {
        id: class.id,
        name: class.name,
        created_at: class.created_at,
        items: Vec::new(),
    }))
}

/// Delete a class and all of its items.
#[utoipa::path(
    delete,
    path = "/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "The class to delete.")
    ),
    responses(
        (status = 200, description = "Class deleted", body = SuccessResponse),
        (status = 404, description = "No such class", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_class_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Path(class_id) = id?;
    app_state.classes.delete_class(class_id).await?;
    info!(%class_id, "Deleted class");
    Ok(Json(SuccessResponse { success: true }))
}
