//! End-to-end API tests
//!
//! These drive the full router against a real PostgreSQL database.
//! Run with: DATABASE_URL=postgres://... cargo test -p scrawl-server -- --ignored

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use scrawl_server::db::{pool, schema};
use scrawl_server::http::server::build_router;
use scrawl_server::AppState;

async fn test_app() -> Router {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = pool::create_pool(&url).await.expect("pool creation failed");
    schema::ensure_schema(&pool)
        .await
        .expect("schema bootstrap failed");
    build_router(AppState::new(pool))
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}{nanos}")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::HOST, "localhost:3000")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "localhost:3000")
            .body(Body::empty())
            .unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(app: &Router) -> (i64, String) {
    let name = unique("user_");
    let response = send(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "username": name, "email": format!("{name}@example.com") })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    (body["data"]["id"].as_i64().unwrap(), name)
}

async fn create_post(app: &Router, user_id: i64, title: &str) -> i64 {
    let response = send(
        app,
        Method::POST,
        &format!("/api/v1/users/{user_id}/posts"),
        Some(json!({ "title": title, "content": "a body long enough to pass validation" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn health_reports_ok() {
    let app = test_app().await;
    let response = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
#[ignore = "requires database"]
async fn created_user_carries_links_and_roundtrips() {
    let app = test_app().await;

    let name = unique("link_");
    let response = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "username": name, "email": format!("{name}@example.com") })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let id = body["data"]["id"].as_i64().expect("integer id");
    let self_href = body["data"]["_links"]["self"]["href"].as_str().unwrap();
    assert!(self_href.ends_with(&format!("/api/v1/users/{id}")));
    assert_eq!(body["data"]["_links"]["update"]["method"], "PUT");

    let response = send(&app, Method::GET, &format!("/api/v1/users/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], name.as_str());
    assert_eq!(body["data"]["email"], format!("{name}@example.com"));
    assert_eq!(body["data"]["created_at"], body["data"]["updated_at"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_user_is_404_without_data() {
    let app = test_app().await;
    let response = send(&app, Method::GET, "/api/v1/users/999999999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "User not found");
    assert!(body.get("data").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_envelope_is_consistent() {
    let app = test_app().await;
    // Guarantee at least one row so total_pages is nonzero
    create_user(&app).await;

    let response = send(&app, Method::GET, "/api/v1/users?page=1&limit=5", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let total = body["pagination"]["total"].as_i64().unwrap();
    let total_pages = body["pagination"]["total_pages"].as_i64().unwrap();
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 5);
    assert_eq!(total_pages, (total + 4) / 5);
    assert!(body["data"].as_array().unwrap().len() <= 5);

    // next/prev keys are always present; prev is null on page 1
    assert!(body["_links"]["prev"].is_null());
    if total_pages > 1 {
        assert!(body["_links"]["next"]["href"].is_string());
    } else {
        assert!(body["_links"]["next"].is_null());
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn invalid_query_parameters_are_field_errors() {
    let app = test_app().await;
    let response = send(
        &app,
        Method::GET,
        "/api/v1/users?page=0&limit=500&sort_by=password",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["page", "limit", "sort_by"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_username_is_conflict() {
    let app = test_app().await;
    let (_, name) = create_user(&app).await;

    let response = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "username": name, "email": format!("{name}.bis@example.com") })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn scoped_post_under_wrong_owner_is_404() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;
    let (stranger, _) = create_user(&app).await;
    let post_id = create_post(&app, owner, &unique("scoped ")).await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{stranger}/posts/{post_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{stranger}/posts/{post_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // still reachable under the real owner
    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{owner}/posts/{post_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn title_only_update_preserves_content() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;
    let post_id = create_post(&app, owner, &unique("before ")).await;

    let before = body_json(
        send(
            &app,
            Method::GET,
            &format!("/api/v1/users/{owner}/posts/{post_id}"),
            None,
        )
        .await,
    )
    .await;

    let after_title = unique("after ");
    let response = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{owner}/posts/{post_id}"),
        Some(json!({ "title": after_title })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = body_json(response).await;
    assert_eq!(after["data"]["title"], after_title.as_str());
    assert_eq!(after["data"]["content"], before["data"]["content"]);
    assert!(
        after["data"]["updated_at"].as_str().unwrap()
            >= before["data"]["updated_at"].as_str().unwrap()
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_missing_resources_is_404() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{owner}/posts/999999999"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, "/api/v1/users/999999999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_user_returns_204_and_cascades() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;
    let post_id = create_post(&app, owner, &unique("cascade ")).await;

    let response = send(&app, Method::DELETE, &format!("/api/v1/users/{owner}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    // the user's posts went with them
    let response = send(&app, Method::GET, &format!("/api/v1/posts/{post_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_post_for_missing_user_is_404() {
    let app = test_app().await;
    let response = send(
        &app,
        Method::POST,
        "/api/v1/users/999999999/posts",
        Some(json!({ "title": "orphan post", "content": "content long enough to validate" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn title_search_matches_literally() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;
    let marker = unique("needle");
    create_post(&app, owner, &format!("{marker} 100% legit")).await;

    let query = format!("title={marker}%20100%25%20legit");
    let response = send(&app, Method::GET, &format!("/api/v1/posts?{query}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    let title = body["data"][0]["title"].as_str().unwrap();
    assert!(title.contains(&marker));
    assert_eq!(body["data"][0]["user_id"].as_i64().unwrap(), owner);
}

#[tokio::test]
#[ignore = "requires database"]
async fn latest_and_most_commented_return_data_arrays() {
    let app = test_app().await;
    let (owner, _) = create_user(&app).await;
    create_post(&app, owner, &unique("ranked ")).await;

    let response = send(&app, Method::GET, "/api/v1/posts/latest?limit=3", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert!(!data.is_empty() && data.len() <= 3);

    let response = send(&app, Method::GET, "/api/v1/posts/most-commented?limit=3", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    for post in body["data"].as_array().unwrap() {
        assert!(post["comment_count"].as_i64().unwrap() >= 0);
    }
}
