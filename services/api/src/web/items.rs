//! services/api/src/web/items.rs
//!
//! Axum handlers for the `/items` resource.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use class_tracker_core::{parse_due_date, ItemFilter, NewItem, Tag, ValidationError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::{
    CreateItemRequest, ErrorResponse, ItemResponse, ListItemsQuery, SuccessResponse,
    UpdateItemRequest,
};
use crate::web::state::AppState;

/// Treats an empty string the same as an absent value.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    present(value).ok_or(ValidationError::Missing(field))
}

impl ListItemsQuery {
    fn into_filter(self) -> Result<ItemFilter, ValidationError> {
        let class_id = required("classId", self.class_id)?;
        let class_id = Uuid::parse_str(&class_id).map_err(|_| ValidationError::InvalidField {
            field: "classId",
            reason: format!("'{}' is not a valid UUID", class_id),
        })?;

        let tag = present(self.tag).map(|t| t.parse::<Tag>()).transpose()?;

        // A present-but-empty `completed` still filters, and means "not completed".
        let completed = self
            .completed
            .map(|raw| match raw.as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(ValidationError::InvalidField {
                    field: "completed",
                    reason: format!("expected 'true' or 'false', got '{}'", raw),
                }),
            })
            .transpose()?;

        let due_date = present(self.due_date)
            .map(|raw| parse_due_date(&raw))
            .transpose()?;

        Ok(ItemFilter {
            class_id,
            tag,
            completed,
            due_date,
        })
    }
}

impl CreateItemRequest {
    fn into_new_item(self) -> Result<NewItem, ValidationError> {
        let name = required("name", self.name)?;
        let tag = required("tag", self.tag)?;
        let due_date = required("dueDate", self.due_date)?;
        let class_id = self.class_id.ok_or(ValidationError::Missing("classId"))?;

        NewItem::new(&name, tag.parse::<Tag>()?, parse_due_date(&due_date)?, class_id)
    }
}

/// List the items of one class, optionally filtered.
///
/// All filters combine with AND. `dueDate` matches every item due on that day.
#[utoipa::path(
    get,
    path = "/items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Matching items, oldest first", body = [ItemResponse]),
        (status = 400, description = "Missing classId or malformed filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_items_handler(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let items = app_state.items.list_items(filter).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Create an item in an existing class.
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Item created", body = ItemResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 404, description = "The class does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_item_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Json(req) = payload?;
    let new_item = req.into_new_item()?;

    let item = app_state.items.create_item(new_item).await?;
    info!(item_id = %item.id, class_id = %item.class_id, "Created item");
    Ok(Json(item.into()))
}

/// Set whether an item is completed. Nothing else about an item can change.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "The item to update.")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "completed is not a boolean", body = ErrorResponse),
        (status = 404, description = "No such item", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_item_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(item_id) = id?;
    let Json(req) = payload?;
    let completed = req.completed.ok_or_else(|| ValidationError::InvalidField {
        field: "completed",
        reason: "must be a boolean".to_string(),
    })?;

    let item = app_state.items.set_item_completed(item_id, completed).await?;
    info!(%item_id, completed, "Updated item completion");
    Ok(Json(item.into()))
}

/// Delete a single item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "The item to delete.")
    ),
    responses(
        (status = 200, description = "Item deleted", body = SuccessResponse),
        (status = 404, description = "No such item", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_item_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Path(item_id) = id?;
    app_state.items.delete_item(item_id).await?;
    info!(%item_id, "Deleted item");
    Ok(Json(SuccessResponse { success: true }))
}
