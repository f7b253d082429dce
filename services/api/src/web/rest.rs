//! services/api/src/web/rest.rs
//!
//! Request and response payloads for the REST API, and the master
//! definition for the OpenAPI specification.

use chrono::{DateTime, NaiveDate, Utc};
use class_tracker_core::domain::{ClassWithItems, Item};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{classes, items};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::health_handler,
        classes::list_classes_handler,
        classes::create_class_handler,
        classes::delete_class_handler,
        items::list_items_handler,
        items::create_item_handler,
        items::update_item_handler,
        items::delete_item_handler,
    ),
    components(
        schemas(
            ClassResponse,
            ItemResponse,
            CreateClassRequest,
            CreateItemRequest,
            UpdateItemRequest,
            SuccessResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Class Tracker API", description = "Classes and their dated assignments and midterms.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// An assignment or midterm belonging to one class.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "assignment")]
    pub tag: String,
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub due_date: NaiveDate,
    pub completed: bool,
    pub class_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            tag: item.tag.to_string(),
            due_date: item.due_date,
            completed: item.completed,
            class_id: item.class_id,
            created_at: item.created_at,
        }
    }
}

/// A class and every item it owns.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<ClassWithItems> for ClassResponse {
    fn from(ClassWithItems { class, items }: ClassWithItems) -> Self {
        Self {
            id: class.id,
            name: class.name,
            created_at: class.created_at,
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

//=========================================================================================
// API Payload Structs
//=========================================================================================

// Fields are optional so that a missing value is reported as a validation
// error naming the field, rather than a generic decode failure.

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    #[schema(example = "CS 101")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[schema(example = "Problem set 3")]
    pub name: Option<String>,
    #[schema(example = "assignment")]
    pub tag: Option<String>,
    #[schema(example = "2024-03-15")]
    pub due_date: Option<String>,
    pub class_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub completed: Option<bool>,
}

/// Filters for `GET /items`. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Required. The class whose items to list.
    pub class_id: Option<String>,
    /// `assignment` or `midterm`.
    pub tag: Option<String>,
    /// `true` or `false`.
    pub completed: Option<String>,
    /// A calendar day, `YYYY-MM-DD`.
    pub due_date: Option<String>,
}
