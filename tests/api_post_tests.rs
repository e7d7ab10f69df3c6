//! 文章 API 集成测试：公开读取，写入经过认证管道

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{assert_unauthorized, create_test_app, create_test_config, login_token, register, send};

async fn app_with_token() -> (axum::Router, String, serde_json::Value) {
    let app = create_test_app(create_test_config());
    let (_, user) = register(&app, "John Doe", "john@mail.com", "1234").await;
    let token = login_token(&app, "john@mail.com", "1234").await;
    (app, token, user)
}

#[tokio::test]
async fn test_create_post_requires_token() {
    let app = create_test_app(create_test_config());

    let (status, body) = send(&app, "POST", "/posts", None, Some(json!({ "title": "Hi" }))).await;

    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn test_create_post_with_token() {
    let (app, token, user) = app_with_token().await;

    let (status, body) = send(
        &app,
        "POST",
        "/posts",
        Some(&token),
        Some(json!({ "title": "Hello", "body": "First post" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Hello");
    assert_eq!(body["author_id"], user["id"]);
}

#[tokio::test]
async fn test_create_post_empty_title_rejected() {
    let (app, token, _) = app_with_token().await;

    let (status, _) =
        send(&app, "POST", "/posts", Some(&token), Some(json!({ "title": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_reads() {
    let (app, token, _) = app_with_token().await;
    let (_, created) =
        send(&app, "POST", "/posts", Some(&token), Some(json!({ "title": "Hello" }))).await;
    let id = created["id"].as_str().unwrap();

    let (status, list) = send(&app, "GET", "/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);

    let (status, post) = send(&app, "GET", &format!("/posts/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "Hello");
}

#[tokio::test]
async fn test_update_and_delete_post() {
    let (app, token, _) = app_with_token().await;
    let (_, created) =
        send(&app, "POST", "/posts", Some(&token), Some(json!({ "title": "Hello" }))).await;
    let uri = format!("/posts/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, None, Some(json!({ "title": "Edited" }))).await;
    assert_unauthorized(status, &body);

    let (status, updated) =
        send(&app, "PUT", &uri, Some(&token), Some(json!({ "title": "Edited" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Edited");

    let (status, body) = send(&app, "DELETE", &uri, None, None).await;
    assert_unauthorized(status, &body);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_post_not_found() {
    let (app, token, _) = app_with_token().await;

    let uri = format!("/posts/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Post not found");
}
