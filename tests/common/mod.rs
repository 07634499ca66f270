//! 集成测试共享工具
//! 提供测试配置、内存凭证存储和无数据库依赖的应用状态

use async_trait::async_trait;
use chrono::Utc;
use game_catalog::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    error::AppError,
    middleware::AppState,
    models::credential::{Credential, NewCredential},
    repository::CredentialStore,
    services::{AuthService, GameService, ReviewService, UserService},
};
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:3000".to_string(),
            graceful_shutdown_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost/test".to_string()),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
            jwt_issuer: "game-catalog".to_string(),
            jwt_audience: "game-catalog-clients".to_string(),
            token_exp_secs: 3600,
            hash_iterations: 1000,
            hash_salt_size_bytes: 16,
            hash_key_size_bytes: 32,
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_digit: true,
            password_require_special: false,
        },
    }
}

/// 内存凭证存储，行为与 Postgres 实现一致（登录名唯一）
pub struct MemoryCredentialStore {
    records: Mutex<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, AppError> {
        Ok(self.records.lock().unwrap().get(login).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<Credential, AppError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&credential.login) {
            return Err(AppError::Conflict("Login already registered".to_string()));
        }

        let stored = Credential {
            id: Uuid::new_v4(),
            login: credential.login.clone(),
            password_hash: credential.password_hash,
            display_name: credential.display_name,
            role: credential.role.to_string(),
            created_at: Utc::now(),
        };
        records.insert(credential.login, stored.clone());
        Ok(stored)
    }
}

/// 构建测试用的应用状态
///
/// 连接池使用 connect_lazy：认证流程走内存凭证存储，
/// 不触发任何真实数据库连接。
pub fn create_test_app_state() -> Arc<AppState> {
    let config = create_test_config();

    let pool = PgPoolOptions::new()
        .connect_lazy(config.database.url.expose_secret())
        .expect("lazy pool creation should not fail");

    let hasher = PasswordHasher::from_config(&config).expect("valid hashing config");
    let jwt_service = Arc::new(JwtService::from_config(&config).expect("valid jwt config"));

    Arc::new(AppState {
        config: config.clone(),
        db: pool.clone(),
        auth_service: Arc::new(AuthService::new(
            Arc::new(MemoryCredentialStore::new()),
            hasher,
            jwt_service.clone(),
        )),
        user_service: Arc::new(UserService::new(pool.clone())),
        game_service: Arc::new(GameService::new(pool.clone())),
        review_service: Arc::new(ReviewService::new(pool)),
        jwt_service,
    })
}
