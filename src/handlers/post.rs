//! 文章的 HTTP 处理器
//! 读取公开，写入需要认证

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::post::{CreatePostRequest, UpdatePostRequest},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出文章
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let posts = state.storage.posts.list().await?;

    Ok(Json(json!({
        "posts": posts,
        "count": posts.len()
    })))
}

/// 获取文章详情
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = state
        .storage
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    Ok(Json(post))
}

/// 创建文章
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let post = state
        .storage
        .posts
        .create(auth_context.claims.id, &req.title, &req.body)
        .await?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok((StatusCode::CREATED, Json(post)))
}

/// 更新文章
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let post = state
        .storage
        .posts
        .update(id, req.title.as_deref(), req.body.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    tracing::info!(post_id = %id, user_id = %auth_context.claims.id, "Post updated");

    Ok(Json(post))
}

/// 删除文章
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !state.storage.posts.delete(id).await? {
        return Err(AppError::NotFound("Post".to_string()));
    }

    tracing::info!(post_id = %id, user_id = %auth_context.claims.id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}
