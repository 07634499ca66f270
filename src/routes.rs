//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
};

use crate::{handlers, middleware::AppState};

/// 请求体大小上限（1 MiB）
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需令牌）
    let auth_routes = Router::new()
        .route("/api/v1/auth/token", post(handlers::auth::issue_token))
        .route("/api/v1/auth/register", post(handlers::auth::register));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        // 当前登录身份
        .route("/api/v1/auth/me", get(handlers::auth::get_current_identity))

        // 用户管理
        .route(
            "/api/v1/users",
            get(handlers::user::list_users)
                .post(handlers::user::create_user)
        )
        .route(
            "/api/v1/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user)
        )

        // 游戏目录
        .route(
            "/api/v1/games",
            get(handlers::game::list_games)
                .post(handlers::game::create_game)
        )
        .route("/api/v1/games/search", get(handlers::game::search_games))
        .route("/api/v1/games/top-rated", get(handlers::game::top_rated_games))
        .route("/api/v1/games/low-rated", get(handlers::game::low_rated_games))
        .route("/api/v1/games/age", get(handlers::game::games_by_age_range))
        .route(
            "/api/v1/games/by-genre/{genre}",
            get(handlers::game::list_games_by_genre)
        )
        .route(
            "/api/v1/games/{id}",
            get(handlers::game::get_game)
                .put(handlers::game::update_game)
                .delete(handlers::game::delete_game)
        )

        // 评论（嵌套在游戏下）
        .route(
            "/api/v1/games/{id}/reviews",
            get(handlers::review::list_reviews)
                .post(handlers::review::create_review)
        )
        .route(
            "/api/v1/games/{id}/reviews/{review_id}",
            get(handlers::review::get_review)
                .put(handlers::review::update_review)
                .delete(handlers::review::delete_review)
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 指标端点
    let metrics_routes = Router::new().route("/metrics", get(handlers::metrics::metrics_export));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .merge(metrics_routes)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
