pub mod classes;
pub mod items;
pub mod rest;
pub mod state;

use axum::{
    response::Json,
    routing::{delete, get, patch},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use classes::{create_class_handler, delete_class_handler, list_classes_handler};
use items::{create_item_handler, delete_item_handler, list_items_handler, update_item_handler};
use state::AppState;

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The server is up")
    )
)]
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the resource routes. Cross-cutting layers are added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/classes", get(list_classes_handler).post(create_class_handler))
        .route("/classes/{id}", delete(delete_class_handler))
        .route("/items", get(list_items_handler).post(create_item_handler))
        .route(
            "/items/{id}",
            patch(update_item_handler).delete(delete_item_handler),
        )
        .with_state(app_state)
}
