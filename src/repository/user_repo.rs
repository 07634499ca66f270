//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::{
        pagination::PageParams,
        user::{CreateUserRequest, UpdateUserRequest, User, UserListQuery},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 检查邮箱是否已被占用（可排除指定用户）
    pub async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// 创建用户
    pub async fn create(&self, req: &CreateUserRequest) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, date_of_birth, telephone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(req.date_of_birth)
        .bind(&req.telephone)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新用户（缺省字段保留原值）
    pub async fn update(&self, id: Uuid, req: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                date_of_birth = COALESCE($5, date_of_birth),
                telephone = COALESCE($6, telephone),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(req.date_of_birth)
        .bind(&req.telephone)
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 删除用户
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按过滤条件分页查询用户
    pub async fn list_filtered(
        &self,
        filter: &UserListQuery,
        page: &PageParams,
    ) -> Result<(Vec<User>, i64), AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR first_name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR last_name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR email ILIKE '%' || $3 || '%')
              AND ($4::boolean IS NULL OR is_active = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#
        )
        .bind(&filter.first_name)
        .bind(&filter.last_name)
        .bind(&filter.email)
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR first_name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR last_name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR email ILIKE '%' || $3 || '%')
              AND ($4::boolean IS NULL OR is_active = $4)
            "#
        )
        .bind(&filter.first_name)
        .bind(&filter.last_name)
        .bind(&filter.email)
        .bind(filter.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok((users, total))
    }
}
