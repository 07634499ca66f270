//! JWT token generation and validation
//! HMAC-SHA256 signed bearer tokens with issuer/audience validation

use crate::{
    config::AppConfig,
    error::AppError,
    models::credential::{Role, VerifiedIdentity},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (credential ID)
    pub sub: String,

    /// Login name
    pub login: String,

    /// Display name
    pub name: String,

    /// Account role
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        if config.security.jwt_issuer.is_empty() || config.security.jwt_audience.is_empty() {
            return Err(AppError::Config(
                "JWT issuer and audience must be configured".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            issuer: config.security.jwt_issuer.clone(),
            audience: config.security.jwt_audience.clone(),
            token_exp_secs: config.security.token_exp_secs,
        })
    }

    /// Seconds until a freshly issued token expires
    pub fn token_exp_secs(&self) -> u64 {
        self.token_exp_secs
    }

    /// Generate a signed token for a verified identity
    pub fn generate_token(&self, identity: &VerifiedIdentity) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.token_exp_secs as i64);

        let claims = Claims {
            sub: identity.id.to_string(),
            login: identity.login.clone(),
            name: identity.display_name.clone(),
            role: identity.role.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Validate and decode token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims)
    }
}

/// Decode the role claim back into the closed role set
pub fn parse_role_claim(claims: &Claims) -> Result<Role, AppError> {
    Role::parse(&claims.role).ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
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

    fn test_identity() -> VerifiedIdentity {
        VerifiedIdentity {
            id: Uuid::new_v4(),
            login: "alice".to_string(),
            display_name: "Alice A".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let identity = test_identity();

        let token = service.generate_token(&identity).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, identity.id.to_string());
        assert_eq!(claims.login, "alice");
        assert_eq!(claims.name, "Alice A");
        assert_eq!(claims.role, "User");
        assert_eq!(parse_role_claim(&claims).unwrap(), Role::User);
    }

    #[test]
    fn test_invalid_token_fails() {
        let service = JwtService::from_config(&test_config()).unwrap();
        assert!(service.validate_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_audience_fails() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let mut other_config = test_config();
        other_config.security.jwt_audience = "another-audience".to_string();
        let other = JwtService::from_config(&other_config).unwrap();

        let token = service.generate_token(&test_identity()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let mut other_config = test_config();
        other_config.security.jwt_secret =
            Secret::new("another_secret_key_32_characters!!".to_string());
        let other = JwtService::from_config(&other_config).unwrap();

        let token = service.generate_token(&test_identity()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }
}
