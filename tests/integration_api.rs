//! API Integration Tests
//!
//! Drive the router end to end over in-memory collaborators.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use expense_tracker::api::middleware::EXTERNAL_USER_ID_HEADER;

mod common;

const FORM: &str = "text=Lunch&amount=12.50&category=Food&date=2024-03-15";

fn submit(body: &str, external_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/records")
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(id) = external_id {
        builder = builder.header(EXTERNAL_USER_ID_HEADER, id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn list(external_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/records");
    if let Some(id) = external_id {
        builder = builder.header(EXTERNAL_USER_ID_HEADER, id);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_add_record_e2e() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(submit(FORM, Some("user_e2e")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["data"]["text"], "Lunch");
    assert_eq!(json["data"]["amount"], 12.5);
    assert_eq!(json["data"]["category"], "Food");
    assert_eq!(json["data"]["date"], "2024-03-15T12:00:00.000Z");
    assert!(json.get("error").is_none());

    // Directory is unreachable in the test app, so the placeholder email is used
    let users = app.store.users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "unknown-user_e2e@example.com");
}

#[tokio::test]
async fn test_add_record_missing_field() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(submit("text=Lunch&amount=12.50&category=Food", Some("user_1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Text, amount, category, or date is missing");
    assert!(json.get("data").is_none());
    assert!(app.store.users.lock().unwrap().is_empty());
}

fn submit_raw(content_type: Option<&str>, body: &str, external_id: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/records")
        .header(EXTERNAL_USER_ID_HEADER, external_id);
    if let Some(value) = content_type {
        builder = builder.header("content-type", value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_add_record_empty_body_without_content_type() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(submit_raw(None, "", "user_1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Text, amount, category, or date is missing");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_add_record_unsupported_content_type() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(submit_raw(Some("text/plain"), FORM, "user_1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Text, amount, category, or date is missing"
    );
    assert!(app.store.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_record_multipart() {
    let app = common::test_app();
    let body = [
        ("text", "Lunch"),
        ("amount", "12.50"),
        ("category", "Food"),
        ("date", "2024-03-15"),
    ]
    .iter()
    .map(|(name, value)| {
        format!("--form-boundary\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    })
    .collect::<String>()
        + "--form-boundary--\r\n";

    let response = app
        .router
        .clone()
        .oneshot(submit_raw(
            Some("multipart/form-data; boundary=form-boundary"),
            &body,
            "user_multipart",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["data"]["text"], "Lunch");
    assert_eq!(json["data"]["date"], "2024-03-15T12:00:00.000Z");
    assert_eq!(app.store.entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_record_invalid_date() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(submit(
            "text=Lunch&amount=12.50&category=Food&date=not-a-date",
            Some("user_1"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid date format");
}

#[tokio::test]
async fn test_add_record_unauthenticated() {
    let app = common::test_app();

    let response = app.router.clone().oneshot(submit(FORM, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "User not authenticated");

    // A blank header is no identity either
    let response = app
        .router
        .clone()
        .oneshot(submit(FORM, Some("  ")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(app.store.users.lock().unwrap().is_empty());
    assert!(app.store.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_records_reflects_new_submissions() {
    let app = common::test_app();

    let response = app
        .router
        .clone()
        .oneshot(list(Some("user_list")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["records"], serde_json::json!([]));

    // The empty listing is now cached; a submission must invalidate it
    for _ in 0..2 {
        let response = app
            .router
            .clone()
            .oneshot(submit(FORM, Some("user_list")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .router
        .clone()
        .oneshot(list(Some("user_list")))
        .await
        .unwrap();
    let json = json_body(response).await;
    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["date"], "2024-03-15T12:00:00.000Z");
    assert_eq!(app.cache.len(), 1);
}

#[tokio::test]
async fn test_list_records_unauthenticated() {
    let app = common::test_app();

    let response = app.router.clone().oneshot(list(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error_code"], "unauthenticated");
}
