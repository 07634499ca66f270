//! Credential and authentication domain models

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login names: letters, digits, underscore, dot, dash
static LOGIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap());

/// Account role. Closed set, stored as text in the credentials table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    /// Parse a stored role value. `None` means the value is outside the
    /// defined set, which indicates a corrupted or tampered record.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Admin" => Some(Role::Admin),
            "User" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account record
///
/// `password_hash` holds the `<iterations>.<salt b64>.<key b64>` encoding and
/// never leaves the trust boundary: it is excluded from serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Credential {
    pub id: Uuid,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Parse the stored role into the closed enumeration
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// New credential prior to insertion (hash already computed)
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub login: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
}

/// Identity confirmed by a successful password verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedIdentity {
    pub id: Uuid,
    pub login: String,
    pub display_name: String,
    pub role: Role,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: VerifiedIdentity,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 50),
        regex(path = *LOGIN_RE, message = "login may only contain letters, digits, '_', '.' and '-'")
    )]
    pub login: String,
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    pub role: Role,
}

/// Credential response (without the stored hash)
#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub id: Uuid,
    pub login: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            login: credential.login,
            display_name: credential.display_name,
            role: credential.role,
            created_at: credential.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("Superuser"), None);
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_credential_response_drops_hash() {
        let credential = Credential {
            id: Uuid::new_v4(),
            login: "alice".to_string(),
            password_hash: "1000.c2FsdA==.a2V5".to_string(),
            display_name: "Alice A".to_string(),
            role: "User".to_string(),
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&CredentialResponse::from(credential)).unwrap();
        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("c2FsdA"));
    }

    #[test]
    fn test_credential_serialization_skips_hash() {
        let credential = Credential {
            id: Uuid::new_v4(),
            login: "alice".to_string(),
            password_hash: "1000.c2FsdA==.a2V5".to_string(),
            display_name: "Alice A".to_string(),
            role: "User".to_string(),
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&credential).unwrap();
        assert!(!serialized.contains("password_hash"));
    }

    #[test]
    fn test_register_request_login_format() {
        let valid = RegisterRequest {
            login: "alice_01.dev-x".to_string(),
            password: "S3cret!!".to_string(),
            display_name: "Alice".to_string(),
            role: Role::User,
        };
        assert!(valid.validate().is_ok());

        let invalid = RegisterRequest {
            login: "alice with spaces".to_string(),
            password: "S3cret!!".to_string(),
            display_name: "Alice".to_string(),
            role: Role::User,
        };
        assert!(invalid.validate().is_err());
    }
}
