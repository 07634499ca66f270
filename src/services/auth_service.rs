//! 认证服务：登录验证、注册、令牌签发

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::credential::{
        Credential, LoginRequest, LoginResponse, NewCredential, RegisterRequest, VerifiedIdentity,
    },
    repository::CredentialStore,
};
use std::sync::Arc;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt_service,
        }
    }

    /// 验证登录凭证
    ///
    /// 「用户不存在」与「密码错误」返回同一个错误值，避免通过响应差异
    /// 枚举已注册的登录名。
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<VerifiedIdentity, AppError> {
        let credential = match self.store.find_by_login(login).await? {
            Some(credential) => credential,
            None => {
                tracing::debug!("Login attempt for unknown account");
                return Err(AppError::Unauthorized);
            }
        };

        let matched = self
            .hasher
            .verify(&credential.password_hash, password)
            .map_err(|e| {
                // 存储的哈希无法解析说明数据损坏或被篡改，
                // 必须与普通登录失败区分开记录
                tracing::error!(
                    credential_id = %credential.id,
                    error = %e,
                    "Stored password hash is malformed"
                );
                AppError::Internal("stored credential is corrupt".to_string())
            })?;

        if !matched {
            tracing::debug!(credential_id = %credential.id, "Password mismatch");
            return Err(AppError::Unauthorized);
        }

        let role = credential.parsed_role().ok_or_else(|| {
            tracing::error!(
                credential_id = %credential.id,
                "Stored role is outside the defined set"
            );
            AppError::Internal("stored credential is corrupt".to_string())
        })?;

        Ok(VerifiedIdentity {
            id: credential.id,
            login: credential.login,
            display_name: credential.display_name,
            role,
        })
    }

    /// 登录并签发令牌
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let identity = self.authenticate(&req.login, &req.password).await?;
        let token = self.jwt_service.generate_token(&identity)?;

        tracing::info!(login = %identity.login, "Login succeeded");

        Ok(LoginResponse {
            token,
            expires_in: self.jwt_service.token_exp_secs(),
            user: identity,
        })
    }

    /// 注册新账号
    ///
    /// 预检查只用于提前给出友好错误；真正的唯一性由存储层约束保证，
    /// 竞态下的冲突同样映射为 Conflict。
    pub async fn register(&self, req: RegisterRequest) -> Result<Credential, AppError> {
        if self.store.find_by_login(&req.login).await?.is_some() {
            return Err(AppError::Conflict("Login already registered".to_string()));
        }

        let password_hash = self.hasher.hash(&req.password);

        let credential = self
            .store
            .insert(NewCredential {
                login: req.login,
                password_hash,
                display_name: req.display_name,
                role: req.role,
            })
            .await?;

        tracing::info!(login = %credential.login, "Account registered");

        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::credential::Role;
    use async_trait::async_trait;
    use chrono::Utc;
    use secrecy::Secret;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// In-memory credential store backing the service tests
    struct MemoryStore {
        records: Mutex<HashMap<String, Credential>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }

        fn put(&self, credential: Credential) {
            self.records
                .lock()
                .unwrap()
                .insert(credential.login.clone(), credential);
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
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

    fn test_config() -> crate::config::AppConfig {
        crate::config::AppConfig {
            server: crate::config::ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: crate::config::DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: crate::config::SecurityConfig {
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

    fn service_with_store(store: Arc<MemoryStore>) -> AuthService {
        let config = test_config();
        AuthService::new(
            store,
            PasswordHasher::from_config(&config).unwrap(),
            Arc::new(JwtService::from_config(&config).unwrap()),
        )
    }

    fn register_request(login: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.to_string(),
            password: "S3cret!pass".to_string(),
            display_name: "Alice A".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with_store(store);

        let credential = service.register(register_request("alice")).await.unwrap();
        assert_eq!(credential.login, "alice");
        assert_eq!(credential.role, "User");
        // 哈希入库，绝不存明文
        assert_ne!(credential.password_hash, "S3cret!pass");
        assert_eq!(credential.password_hash.split('.').count(), 3);

        let identity = service.authenticate("alice", "S3cret!pass").await.unwrap();
        assert_eq!(identity.login, "alice");
        assert_eq!(identity.display_name, "Alice A");
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with_store(store);

        service.register(register_request("alice")).await.unwrap();

        let err = service.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_login_and_wrong_password_are_indistinguishable() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with_store(store);

        service.register(register_request("alice")).await.unwrap();

        let unknown = service
            .authenticate("nonexistent", "anything")
            .await
            .unwrap_err();
        let wrong = service.authenticate("alice", "wrong").await.unwrap_err();

        // 两种失败必须是同一个错误值，对外不可区分
        assert!(matches!(unknown, AppError::Unauthorized));
        assert!(matches!(wrong, AppError::Unauthorized));
        assert_eq!(unknown.user_message(), wrong.user_message());
        assert_eq!(unknown.code(), wrong.code());
    }

    #[tokio::test]
    async fn test_duplicate_register_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with_store(store);

        service.register(register_request("alice")).await.unwrap();

        let err = service.register(register_request("alice")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_internal_error() {
        let store = Arc::new(MemoryStore::new());
        store.put(Credential {
            id: Uuid::new_v4(),
            login: "corrupt".to_string(),
            password_hash: "not-a-valid-hash".to_string(),
            display_name: "Corrupt".to_string(),
            role: "User".to_string(),
            created_at: Utc::now(),
        });
        let service = service_with_store(store);

        // 数据损坏是内部错误，不是登录失败
        let err = service.authenticate("corrupt", "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_internal_error() {
        let config = test_config();
        let hasher = PasswordHasher::from_config(&config).unwrap();

        let store = Arc::new(MemoryStore::new());
        store.put(Credential {
            id: Uuid::new_v4(),
            login: "strange".to_string(),
            password_hash: hasher.hash("S3cret!pass"),
            display_name: "Strange".to_string(),
            role: "Overlord".to_string(),
            created_at: Utc::now(),
        });
        let service = service_with_store(store);

        let err = service.authenticate("strange", "S3cret!pass").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with_store(store);

        service.register(register_request("alice")).await.unwrap();

        let response = service
            .login(LoginRequest {
                login: "alice".to_string(),
                password: "S3cret!pass".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user.login, "alice");
    }
}
