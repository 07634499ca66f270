//! 评论管理的 HTTP 处理器（嵌套在游戏资源下）

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::review::{CreateReviewRequest, ReviewListQuery, ReviewResponse, UpdateReviewRequest},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出某游戏的评论
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(game_id): Path<Uuid>,
    Query(filter): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.review_service.list_for_game(game_id, filter).await?;

    Ok(Json(page))
}

/// 创建评论
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(game_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let review = state.review_service.create(game_id, req).await?;

    Ok(Json(json!({
        "message": "评论创建成功",
        "review": ReviewResponse::from(review)
    })))
}

/// 获取单条评论
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path((game_id, id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let review = state.review_service.get(game_id, id).await?;

    Ok(Json(ReviewResponse::from(review)))
}

/// 更新评论
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path((game_id, id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let review = state.review_service.update(game_id, id, req).await?;

    Ok(Json(json!({
        "message": "评论更新成功",
        "review": ReviewResponse::from(review)
    })))
}

/// 删除评论
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path((game_id, id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    state.review_service.delete(game_id, id).await?;

    Ok(Json(json!({
        "message": "评论删除成功"
    })))
}
