//! 用户管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        credential::Role,
        user::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse},
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

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Query(filter): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.user_service.list(filter).await?;

    Ok(Json(page))
}

/// 创建用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state.user_service.create(req).await?;

    Ok(Json(json!({
        "message": "用户创建成功",
        "user": UserResponse::from(user)
    })))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.get(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// 更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state.user_service.update(id, req).await?;

    Ok(Json(json!({
        "message": "用户更新成功",
        "user": UserResponse::from(user)
    })))
}

/// 删除用户（仅管理员）
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(Role::Admin)?;

    state.user_service.delete(id).await?;

    Ok(Json(json!({
        "message": "用户删除成功"
    })))
}
