//! 用户业务服务

use crate::{
    error::AppError,
    models::{
        pagination::{PagedResponse, PageParams},
        user::{CreateUserRequest, UpdateUserRequest, User, UserListQuery, UserResponse},
    },
    repository::UserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 分页查询用户
    pub async fn list(&self, filter: UserListQuery) -> Result<PagedResponse<UserResponse>, AppError> {
        let page = PageParams::new(filter.page_number, filter.page_size);

        let repo = UserRepository::new(self.db.clone());
        let (users, total) = repo.list_filtered(&filter, &page).await?;

        let items = users.into_iter().map(UserResponse::from).collect();
        Ok(PagedResponse::new(items, total, &page))
    }

    /// 获取单个用户
    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        let repo = UserRepository::new(self.db.clone());
        repo.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    /// 创建用户，邮箱重复返回 Conflict
    pub async fn create(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let repo = UserRepository::new(self.db.clone());

        if repo.email_exists(&req.email, None).await? {
            return Err(AppError::conflict("Email already registered"));
        }

        repo.create(&req).await
    }

    /// 更新用户
    pub async fn update(&self, id: Uuid, req: UpdateUserRequest) -> Result<User, AppError> {
        let repo = UserRepository::new(self.db.clone());

        if repo.find_by_id(&id).await?.is_none() {
            return Err(AppError::not_found("user"));
        }

        // 邮箱不能被其他用户占用
        if let Some(email) = &req.email {
            if repo.email_exists(email, Some(id)).await? {
                return Err(AppError::conflict("Email already registered by another user"));
            }
        }

        repo.update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    /// 删除用户
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let repo = UserRepository::new(self.db.clone());

        if !repo.delete(id).await? {
            return Err(AppError::not_found("user"));
        }

        Ok(())
    }
}
