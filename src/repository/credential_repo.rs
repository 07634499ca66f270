//! Credential repository (数据库访问层)

use crate::{
    error::AppError,
    models::credential::{Credential, NewCredential},
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Storage interface consumed by the authentication service.
///
/// Login matching is exact: no trimming and no case normalization.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 按登录名精确查找凭证
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError>;

    /// 插入新凭证；登录名冲突返回 Conflict
    async fn insert(&self, credential: NewCredential) -> Result<Credential, AppError>;
}

pub struct CredentialRepository {
    db: PgPool,
}

impl CredentialRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT * FROM credentials WHERE login = $1"
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await?;

        Ok(credential)
    }

    async fn insert(&self, credential: NewCredential) -> Result<Credential, AppError> {
        let inserted = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO credentials (login, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(&credential.login)
        .bind(&credential.password_hash)
        .bind(&credential.display_name)
        .bind(credential.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            // 唯一约束冲突说明登录名已被占用（包括预检查之后的竞态）
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Login already registered".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(inserted)
    }
}
