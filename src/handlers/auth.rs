//! 认证相关的 HTTP 处理器

use crate::{
    auth::{middleware::AuthContext, password::PasswordHasher},
    error::AppError,
    middleware::AppState,
    models::credential::{CredentialResponse, LoginRequest, RegisterRequest},
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 登录并签发令牌
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 注册新账号
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // 验证密码策略
    PasswordHasher::validate_password_policy(&req.password, &state.config)?;

    let credential = state.auth_service.register(req).await?;

    Ok(Json(json!({
        "message": "注册成功",
        "credential": CredentialResponse::from(credential)
    })))
}

/// 获取当前登录身份
pub async fn get_current_identity(
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "id": auth_context.credential_id,
        "login": auth_context.login,
        "display_name": auth_context.display_name,
        "role": auth_context.role,
    })))
}
