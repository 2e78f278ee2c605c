//! # Authentication
//!
//! JWT issuance/validation, argon2 password handling, and the static
//! api-key guard on `/api` routes.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Auth Components                                  │
//! │                                                                         │
//! │  POST /auth/login {username, password, userType}                       │
//! │       │                                                                 │
//! │       ├── lookup Users or AdminUsers by username (per userType)        │
//! │       ├── argon2 verify against the stored hash                        │
//! │       └── JWT with {sub, username, userType, iat, exp, jti}            │
//! │                                                                         │
//! │  /api/* ──► require_api_key middleware ──► handlers                    │
//! │             (constant x-api-key header, 401 envelope otherwise)        │
//! │                                                                         │
//! │  GET /auth/verify ──► bearer token ──► claims echoed back              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::types::UserType;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,

    /// Username at issuance time.
    pub username: String,

    /// Which account table the subject lives in.
    pub user_type: UserType,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,

    /// Unique identifier for this token.
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generates a bearer token for an authenticated user.
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        user_type: UserType,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            user_type,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            ApiError::Store(atrium_db::StoreError::OperationFailed(format!(
                "failed to generate token: {e}"
            )))
        })
    }

    /// Validates and decodes a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;

        Ok(token_data.claims)
    }
}

/// Extracts a bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            ApiError::Store(atrium_db::StoreError::OperationFailed(format!(
                "failed to hash password: {e}"
            )))
        })
}

/// Verifies a password against a stored argon2 hash.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller sees the same rejection as a wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// API Key Guard
// =============================================================================

/// Middleware requiring the static `x-api-key` header on every `/api` route.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == state.config.api_key => Ok(next.run(request).await),
        Some(_) => Err(ApiError::Unauthorized("invalid api key".to_string())),
        None => Err(ApiError::Unauthorized("missing x-api-key header".to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager
            .generate_token("u-1", "jfields", UserType::Client)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.username, "jfields");
        assert_eq!(claims.user_type, UserType::Client);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtManager::new("secret-a".to_string(), 3600);
        let verifier = JwtManager::new("secret-b".to_string(), 3600);

        let token = issuer
            .generate_token("u-1", "jfields", UserType::Admin)
            .unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_malformed_stored_hash_verifies_false() {
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
