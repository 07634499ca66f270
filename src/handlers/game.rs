//! 游戏管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::game::{
        AgeRangeQuery, GameListQuery, GameResponse, TakeQuery, TitleSearchQuery, UpsertGameRequest,
    },
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

/// 列出游戏
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(filter): Query<GameListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.game_service.list(filter).await?;

    Ok(Json(page))
}

/// 创建游戏
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Json(req): Json<UpsertGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let game = state.game_service.create(req).await?;

    Ok(Json(json!({
        "message": "游戏创建成功",
        "game": GameResponse::from(game)
    })))
}

/// 获取游戏详情
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let game = state.game_service.get(id).await?;

    Ok(Json(GameResponse::from(game)))
}

/// 更新游戏
pub async fn update_game(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let game = state.game_service.update(id, req).await?;

    Ok(Json(json!({
        "message": "游戏更新成功",
        "game": GameResponse::from(game)
    })))
}

/// 删除游戏
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.game_service.delete(id).await?;

    Ok(Json(json!({
        "message": "游戏删除成功"
    })))
}

/// 按类型列出游戏
pub async fn list_games_by_genre(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(genre): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let games = state.game_service.list_by_genre(&genre).await?;

    let responses: Vec<GameResponse> = games.into_iter().map(GameResponse::from).collect();
    Ok(Json(responses))
}

/// 标题搜索，无结果时返回 404
pub async fn search_games(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<TitleSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let games = state.game_service.search_by_title(&query.title).await?;

    if games.is_empty() {
        return Err(AppError::NotFound(format!(
            "no games matching title '{}'",
            query.title
        )));
    }

    let responses: Vec<GameResponse> = games.into_iter().map(GameResponse::from).collect();
    Ok(Json(responses))
}

/// 评分最高的游戏
pub async fn top_rated_games(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<TakeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let games = state.game_service.top_rated(query.take).await?;

    let responses: Vec<GameResponse> = games.into_iter().map(GameResponse::from).collect();
    Ok(Json(responses))
}

/// 评分最低的游戏
pub async fn low_rated_games(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<TakeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let games = state.game_service.low_rated(query.take).await?;

    let responses: Vec<GameResponse> = games.into_iter().map(GameResponse::from).collect();
    Ok(Json(responses))
}

/// 按适龄范围列出游戏，无结果时返回 404
pub async fn games_by_age_range(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(query): Query<AgeRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let games = state
        .game_service
        .list_by_age_range(query.min, query.max, query.include_unknown)
        .await?;

    if games.is_empty() {
        return Err(AppError::not_found("no games in that age range"));
    }

    let responses: Vec<GameResponse> = games.into_iter().map(GameResponse::from).collect();
    Ok(Json(responses))
}
