//! Password hashing and verification using PBKDF2-HMAC-SHA256
//!
//! Stored hashes use the delimited form `<iterations>.<salt b64>.<key b64>`.
//! The iteration count and key length embedded in a stored hash always win
//! over the currently configured parameters, so records written under an
//! older configuration keep verifying after a parameter change.

use crate::{config::AppConfig, error::AppError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

/// Errors raised when a stored hash cannot be parsed.
///
/// A mismatching password is NOT an error; `verify` reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("encoded hash must have exactly three '.'-separated fields")]
    FieldCount,

    #[error("encoded hash iteration count is not a positive integer")]
    InvalidIterations,

    #[error("encoded hash contains an invalid base64 field")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("encoded hash salt or key is empty")]
    EmptyField,
}

/// Password hasher with configurable parameters
pub struct PasswordHasher {
    iterations: u32,
    salt_size: usize,
    key_size: usize,
}

impl PasswordHasher {
    /// Create a hasher. Zero-valued parameters are a configuration error and
    /// must prevent the service from starting.
    pub fn new(iterations: u32, salt_size: usize, key_size: usize) -> Result<Self, AppError> {
        if iterations == 0 {
            return Err(AppError::Config(
                "hash_iterations must be a positive integer".to_string(),
            ));
        }

        if salt_size == 0 || key_size == 0 {
            return Err(AppError::Config(
                "hash_salt_size_bytes and hash_key_size_bytes must be positive".to_string(),
            ));
        }

        Ok(Self {
            iterations,
            salt_size,
            key_size,
        })
    }

    /// Create hasher from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.hash_iterations,
            config.security.hash_salt_size_bytes,
            config.security.hash_key_size_bytes,
        )
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Two calls with the same password yield different encodings; only
    /// `verify` can relate a password to a stored hash.
    pub fn hash(&self, password: &str) -> String {
        let mut salt = vec![0u8; self.salt_size];
        OsRng.fill_bytes(&mut salt);

        let mut key = vec![0u8; self.key_size];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.iterations, &mut key);

        format!(
            "{}.{}.{}",
            self.iterations,
            BASE64.encode(&salt),
            BASE64.encode(&key)
        )
    }

    /// Verify a candidate password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors only when the stored hash
    /// itself does not parse.
    pub fn verify(&self, encoded: &str, password: &str) -> Result<bool, PasswordHashError> {
        let fields: Vec<&str> = encoded.split('.').collect();
        if fields.len() != 3 {
            return Err(PasswordHashError::FieldCount);
        }

        let iterations: u32 = fields[0]
            .parse()
            .map_err(|_| PasswordHashError::InvalidIterations)?;
        if iterations == 0 {
            return Err(PasswordHashError::InvalidIterations);
        }

        let salt = BASE64.decode(fields[1])?;
        let stored_key = BASE64.decode(fields[2])?;
        if salt.is_empty() || stored_key.is_empty() {
            return Err(PasswordHashError::EmptyField);
        }

        // Re-derive with the embedded parameters, matching the stored key
        // length rather than the configured one.
        let mut candidate = vec![0u8; stored_key.len()];
        pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut candidate);

        Ok(fixed_time_eq(&candidate, &stored_key))
    }

    /// Validate password against policy
    pub fn validate_password_policy(password: &str, config: &AppConfig) -> Result<(), AppError> {
        let policy = &config.security;

        // Check length
        if password.len() < policy.password_min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                policy.password_min_length
            )));
        }

        // Check uppercase
        if policy.password_require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        // Check digit
        if policy.password_require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one digit".to_string(),
            ));
        }

        // Check special character
        if policy.password_require_special {
            let has_special = password.chars().any(|c| !c.is_alphanumeric());
            if !has_special {
                return Err(AppError::BadRequest(
                    "Password must contain at least one special character".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Constant-time byte comparison to prevent timing attacks.
/// Every byte is examined regardless of where the first mismatch occurs.
fn fixed_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> PasswordHasher {
        // Low iteration count keeps the unit tests fast
        PasswordHasher::new(1000, 16, 32).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let password = "TestPassword123!";

        let hash = hasher.hash(password);
        assert!(hasher.verify(&hash, password).unwrap());
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = test_hasher();
        let hash = hasher.hash("TestPassword123!");

        assert!(!hasher.verify(&hash, "WrongPassword").unwrap());
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = test_hasher();
        let password = "TestPassword123!";

        let hash1 = hasher.hash(password);
        let hash2 = hasher.hash(password);

        // Hashes should be different due to salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(hasher.verify(&hash1, password).unwrap());
        assert!(hasher.verify(&hash2, password).unwrap());
    }

    #[test]
    fn test_hash_format_has_three_fields() {
        let hasher = test_hasher();
        let hash = hasher.hash("TestPassword123!");

        let fields: Vec<&str> = hash.split('.').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "1000");
    }

    #[test]
    fn test_verify_uses_embedded_iterations() {
        let old = PasswordHasher::new(1000, 16, 32).unwrap();
        let new = PasswordHasher::new(5000, 16, 32).unwrap();

        // A hash written under the old iteration count still verifies after
        // the configuration changes.
        let hash = old.hash("TestPassword123!");
        assert!(new.verify(&hash, "TestPassword123!").unwrap());
    }

    #[test]
    fn test_verify_malformed_field_count() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.verify("abc", "password"),
            Err(PasswordHashError::FieldCount)
        ));
        assert!(matches!(
            hasher.verify("1000.c2FsdA==", "password"),
            Err(PasswordHashError::FieldCount)
        ));
        assert!(matches!(
            hasher.verify("1000.a.b.c", "password"),
            Err(PasswordHashError::FieldCount)
        ));
    }

    #[test]
    fn test_verify_malformed_iterations() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.verify("abc.c2FsdA==.a2V5a2V5", "password"),
            Err(PasswordHashError::InvalidIterations)
        ));
        assert!(matches!(
            hasher.verify("0.c2FsdA==.a2V5a2V5", "password"),
            Err(PasswordHashError::InvalidIterations)
        ));
        assert!(matches!(
            hasher.verify("-5.c2FsdA==.a2V5a2V5", "password"),
            Err(PasswordHashError::InvalidIterations)
        ));
    }

    #[test]
    fn test_verify_malformed_base64() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.verify("1000.!!!.a2V5a2V5", "password"),
            Err(PasswordHashError::InvalidEncoding(_))
        ));
        assert!(matches!(
            hasher.verify("1000.c2FsdA==.???", "password"),
            Err(PasswordHashError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_verify_empty_fields() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.verify("1000..", "password"),
            Err(PasswordHashError::EmptyField)
        ));
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert!(PasswordHasher::new(0, 16, 32).is_err());
        assert!(PasswordHasher::new(1000, 0, 32).is_err());
        assert!(PasswordHasher::new(1000, 16, 0).is_err());
    }

    #[test]
    fn test_fixed_time_eq() {
        assert!(fixed_time_eq(b"hello", b"hello"));
        assert!(!fixed_time_eq(b"hello", b"world"));
        assert!(!fixed_time_eq(b"short", b"longer"));
        // Near-match (single trailing byte differs) is still a mismatch
        assert!(!fixed_time_eq(b"hellp", b"hello"));
    }
}
