//! Bearer 令牌认证中间件
//!
//! 两个阶段：
//! 1. `extract_bearer_middleware` 从 Authorization 头取出令牌，存入请求扩展
//! 2. `verify_token_middleware` 校验扩展中的令牌，成功后写入 `AuthContext`
//!
//! 任一阶段失败都返回 `AuthFailure`，由 `AppError` 统一渲染为 401。

use crate::{
    auth::jwt::{Claims, JwtService},
    error::{AppError, AuthFailure},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Token scheme accepted in the Authorization header
pub const BEARER_SCHEME: &str = "Bearer";

/// 已提取但尚未校验的令牌（请求级存储）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub claims: Claims,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized(AuthFailure::Verification))
    }
}

/// 从 Authorization 头提取令牌
///
/// 期望格式 `Bearer <token>`：按第一个空格切分，方案名不区分大小写，
/// 令牌部分不能为空且不能再包含空白。
pub fn extract_token(headers: &HeaderMap) -> Result<String, AuthFailure> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthFailure::Extraction)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthFailure::Extraction)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME)
        || token.is_empty()
        || token.chars().any(char::is_whitespace)
    {
        return Err(AuthFailure::Extraction);
    }

    Ok(token.to_string())
}

/// 提取中间件：把令牌放入请求扩展
pub async fn extract_bearer_middleware(
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers()).map_err(|failure| {
        tracing::debug!(uri = %req.uri(), "Bearer token missing or malformed");
        failure
    })?;

    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

/// 校验中间件：必须在提取中间件之后运行
pub async fn verify_token_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // NoToken -> Rejected
    let BearerToken(token) = req
        .extensions_mut()
        .remove::<BearerToken>()
        .ok_or(AuthFailure::Extraction)?;

    // TokenPresentUnverified -> Authorized | Rejected
    let claims = jwt_service.verify(&token)?;

    tracing::debug!(user_id = %claims.id, "Request authorized");
    req.extensions_mut().insert(AuthContext { claims });

    Ok(next.run(req).await)
}
