//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::middleware as auth_mw, handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/posts", get(handlers::post::list_posts))
        .route("/posts/{id}", get(handlers::post::get_post));

    // 需要认证的路由
    // route_layer: 后添加的先执行，所以提取在校验之前；未匹配的路径仍返回 404
    let authenticated_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_current_user))
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            axum::routing::put(handlers::post::update_post).delete(handlers::post::delete_post),
        )
        .route_layer(from_fn_with_state(
            state.jwt_service.clone(),
            auth_mw::verify_token_middleware,
        ))
        .route_layer(from_fn(auth_mw::extract_bearer_middleware));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
