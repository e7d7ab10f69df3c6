//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, RegisterRequest},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let user = state.auth_service.register(req).await?;

    Ok(Json(user))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 获取当前用户信息（来自令牌，不查库）
pub async fn get_current_user(auth_context: AuthContext) -> impl IntoResponse {
    Json(auth_context.claims)
}
