//! End-to-end tests of the HTTP surface, run against the in-memory store.

use std::sync::Arc;

use api_lib::adapters::MemoryStore;
use api_lib::web::{router, state::AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    router(Arc::new(AppState::with_store(Arc::new(MemoryStore::new()))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn create_class(app: &Router, name: &str) -> Value {
    let (status, class) = send(app, "POST", "/classes", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK, "{class}");
    class
}

async fn create_item(app: &Router, class_id: &str, name: &str, tag: &str, due: &str) -> Value {
    let (status, item) = send(
        app,
        "POST",
        "/items",
        Some(json!({ "name": name, "tag": tag, "dueDate": due, "classId": class_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{item}");
    item
}

fn ids(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn class_names_are_sanitized_on_create() {
    let app = app();
    let class = create_class(&app, "  Linear Algebra (MATH-221)!  ").await;
    assert_eq!(class["name"], "Linear Algebra MATH-221");
    assert_eq!(class["items"], json!([]));
    assert!(Uuid::parse_str(class["id"].as_str().unwrap()).is_ok());

    let (status, classes) = send(&app, "GET", "/classes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(classes[0]["name"], "Linear Algebra MATH-221");
}

#[tokio::test]
async fn class_name_that_sanitizes_to_nothing_is_rejected() {
    let app = app();
    let (status, body) = send(&app, "POST", "/classes", Some(json!({ "name": "!!!" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));

    let (_, classes) = send(&app, "GET", "/classes", None).await;
    assert_eq!(classes, json!([]));
}

#[tokio::test]
async fn class_name_must_be_a_present_string() {
    let app = app();
    for body in [json!({}), json!({ "name": 42 }), json!({ "name": null })] {
        let (status, _) = send(&app, "POST", "/classes", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/classes")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_sanitized_class_name_conflicts() {
    let app = app();
    create_class(&app, "Physics").await;

    let (status, body) = send(&app, "POST", "/classes", Some(json!({ "name": " Physics?" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (_, classes) = send(&app, "GET", "/classes", None).await;
    assert_eq!(classes.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_class_cascades_to_its_items() {
    let app = app();
    let class = create_class(&app, "History").await;
    let class_id = class["id"].as_str().unwrap();
    create_item(&app, class_id, "Essay", "assignment", "2024-03-15").await;
    create_item(&app, class_id, "Final", "midterm", "2024-04-01").await;

    let (_, classes) = send(&app, "GET", "/classes", None).await;
    assert_eq!(classes[0]["items"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "DELETE", &format!("/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, items) = send(&app, "GET", &format!("/items?classId={class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));

    let (_, classes) = send(&app, "GET", "/classes", None).await;
    assert_eq!(classes, json!([]));
}

#[tokio::test]
async fn deleting_a_missing_class_is_not_found() {
    let (status, _) = send(&app(), "DELETE", &format!("/classes/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = app();
    let (status, _) = send(&app, "DELETE", "/classes/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "PATCH", "/items/not-a-uuid", Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_item_has_defaults_and_calendar_date() {
    let app = app();
    let class = create_class(&app, "Chemistry").await;
    let class_id = class["id"].as_str().unwrap();

    let item = create_item(&app, class_id, " Lab #3 ", "assignment", "2024-03-15").await;
    assert_eq!(item["name"], "Lab 3");
    assert_eq!(item["tag"], "assignment");
    assert_eq!(item["dueDate"], "2024-03-15");
    assert_eq!(item["completed"], false);
    assert_eq!(item["classId"], class_id);

    let late = create_item(&app, class_id, "Quiz", "midterm", "2024-03-15T23:30:00-08:00").await;
    assert_eq!(late["dueDate"], "2024-03-15");
}

#[tokio::test]
async fn item_tag_must_be_assignment_or_midterm() {
    let app = app();
    let class = create_class(&app, "Biology").await;
    let class_id = class["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/items",
        Some(json!({ "name": "Big test", "tag": "exam", "dueDate": "2024-03-15", "classId": class_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("assignment"));

    create_item(&app, class_id, "Homework", "assignment", "2024-03-15").await;
    create_item(&app, class_id, "Midterm 1", "midterm", "2024-03-20").await;
}

#[tokio::test]
async fn item_fields_are_all_required() {
    let app = app();
    let class = create_class(&app, "Economics").await;
    let class_id = class["id"].as_str().unwrap();
    let complete = json!({ "name": "Report", "tag": "assignment", "dueDate": "2024-03-15", "classId": class_id });

    for field in ["name", "tag", "dueDate", "classId"] {
        let mut body = complete.clone();
        body.as_object_mut().unwrap().remove(field);
        let (status, error) = send(&app, "POST", "/items", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "without {field}");
        assert_eq!(error["error"], format!("{field} is required"));
    }

    let mut bad_name = complete.clone();
    bad_name["name"] = json!("???");
    let (status, _) = send(&app, "POST", "/items", Some(bad_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_date = complete;
    bad_date["dueDate"] = json!("next friday");
    let (status, _) = send(&app, "POST", "/items", Some(bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_for_unknown_class_is_not_found() {
    let (status, _) = send(
        &app(),
        "POST",
        "/items",
        Some(json!({ "name": "Orphan", "tag": "assignment", "dueDate": "2024-03-15", "classId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_items_requires_class_id() {
    let app = app();
    let class = create_class(&app, "Music").await;
    create_item(&app, class["id"].as_str().unwrap(), "Scales", "assignment", "2024-03-15").await;

    for uri in ["/items", "/items?classId=", "/items?tag=assignment"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "classId is required");
    }
}

#[tokio::test]
async fn due_date_filter_matches_one_calendar_day() {
    let app = app();
    let class = create_class(&app, "Statistics").await;
    let class_id = class["id"].as_str().unwrap();
    let first = create_item(&app, class_id, "Set 1", "assignment", "2024-03-15").await;
    create_item(&app, class_id, "Set 2", "assignment", "2024-03-16").await;

    let (status, items) = send(
        &app,
        "GET",
        &format!("/items?classId={class_id}&dueDate=2024-03-15"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&items), [first["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn filters_combine_and_absent_completed_means_any() {
    let app = app();
    let class = create_class(&app, "Literature").await;
    let class_id = class["id"].as_str().unwrap();
    let essay = create_item(&app, class_id, "Essay", "assignment", "2024-03-15").await;
    let midterm = create_item(&app, class_id, "Midterm", "midterm", "2024-03-15").await;
    let other = create_class(&app, "Drama").await;
    create_item(&app, other["id"].as_str().unwrap(), "Play", "assignment", "2024-03-15").await;

    let essay_id = essay["id"].as_str().unwrap();
    let (status, _) = send(&app, "PATCH", &format!("/items/{essay_id}"), Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = send(&app, "GET", &format!("/items?classId={class_id}"), None).await;
    assert_eq!(ids(&all), [essay_id, midterm["id"].as_str().unwrap()]);

    let (_, done) = send(&app, "GET", &format!("/items?classId={class_id}&completed=true"), None).await;
    assert_eq!(ids(&done), [essay_id]);

    let (_, open) = send(&app, "GET", &format!("/items?classId={class_id}&completed=false"), None).await;
    assert_eq!(ids(&open), [midterm["id"].as_str().unwrap()]);

    let (_, none) = send(
        &app,
        "GET",
        &format!("/items?classId={class_id}&tag=midterm&completed=true"),
        None,
    )
    .await;
    assert_eq!(none, json!([]));

    let (status, _) = send(&app, "GET", &format!("/items?classId={class_id}&completed=maybe"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_completed_parameter_filters_to_open_items() {
    let app = app();
    let class = create_class(&app, "Astronomy").await;
    let class_id = class["id"].as_str().unwrap();
    let done = create_item(&app, class_id, "Star chart", "assignment", "2024-03-15").await;
    let open = create_item(&app, class_id, "Telescope log", "assignment", "2024-03-15").await;

    let done_uri = format!("/items/{}", done["id"].as_str().unwrap());
    let (status, _) = send(&app, "PATCH", &done_uri, Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, items) = send(&app, "GET", &format!("/items?classId={class_id}&completed="), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&items), [open["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn completing_an_item_twice_is_idempotent() {
    let app = app();
    let class = create_class(&app, "Geography").await;
    let item = create_item(&app, class["id"].as_str().unwrap(), "Map", "assignment", "2024-03-15").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "completed": true }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["name"], "Map");
        assert_eq!(updated["dueDate"], "2024-03-15");
    }
}

#[tokio::test]
async fn completion_must_be_a_boolean() {
    let app = app();
    let class = create_class(&app, "Spanish").await;
    let item = create_item(&app, class["id"].as_str().unwrap(), "Vocab", "assignment", "2024-03-15").await;
    let uri = format!("/items/{}", item["id"].as_str().unwrap());

    for body in [json!({ "completed": "true" }), json!({ "completed": 1 }), json!({})] {
        let (status, _) = send(&app, "PATCH", &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }

    let (status, _) = send(&app, "PATCH", &format!("/items/{}", Uuid::new_v4()), Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_item_leaves_its_siblings() {
    let app = app();
    let class = create_class(&app, "Philosophy").await;
    let class_id = class["id"].as_str().unwrap();
    let doomed = create_item(&app, class_id, "Reading 1", "assignment", "2024-03-15").await;
    let kept = create_item(&app, class_id, "Reading 2", "assignment", "2024-03-16").await;
    let doomed_uri = format!("/items/{}", doomed["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &doomed_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, items) = send(&app, "GET", &format!("/items?classId={class_id}"), None).await;
    assert_eq!(ids(&items), [kept["id"].as_str().unwrap()]);

    let (status, _) = send(&app, "DELETE", &doomed_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
