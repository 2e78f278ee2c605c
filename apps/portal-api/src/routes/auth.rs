//! Login and token verification endpoints.
//!
//! Unknown username and wrong password produce the same rejection, and the
//! unknown-username path burns a verification against a throwaway hash, so
//! the login endpoint cannot be used to probe which accounts exist by either
//! message or timing.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use atrium_core::types::UserType;
use atrium_core::validation::validate_login;

use crate::auth::{extract_bearer_token, verify_password};
use crate::error::{ok, ApiError, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

/// Well-formed hash that matches no password. Verified against when the
/// username misses, so both miss paths pay the same argon2 cost.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$K5d2xKDVUg8uCSDBuTAqWMcVtDDSsOfN9QogsKXBn2Y";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Which account table to authenticate against.
    pub user_type: UserType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user_id: String,
    pub username: String,
    pub user_type: UserType,
    /// Unix timestamp the token expires at.
    pub expires_at: i64,
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<LoginResponse>>> {
    validate_login(&req.username, &req.password)?;

    let account = match req.user_type {
        UserType::Client => state
            .db
            .users()
            .find_by_username(&req.username)
            .await?
            .map(|u| (u.id, u.username, u.password_hash)),
        UserType::Admin => state
            .db
            .admin_users()
            .find_by_username(&req.username)
            .await?
            .map(|u| (u.id, u.username, u.password_hash)),
    };

    let verified = match &account {
        Some((_, _, stored_hash)) => verify_password(&req.password, stored_hash),
        None => {
            verify_password(&req.password, DECOY_HASH);
            false
        }
    };
    let (user_id, username, _) = match (account, verified) {
        (Some(account), true) => account,
        _ => return Err(ApiError::Unauthorized("invalid credentials".to_string())),
    };

    let token = state.jwt.generate_token(&user_id, &username, req.user_type)?;

    tracing::info!(username = %username, user_type = ?req.user_type, "Login succeeded");

    Ok(ok(LoginResponse {
        token,
        user_id,
        username,
        user_type: req.user_type,
    }))
}

/// `GET /auth/verify`
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Envelope<VerifyResponse>>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.jwt.validate_token(token)?;

    Ok(ok(VerifyResponse {
        user_id: claims.sub,
        username: claims.username,
        user_type: claims.user_type,
        expires_at: claims.exp,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordHash;

    /// The decoy must parse as a real PHC string, otherwise verification
    /// bails before doing any argon2 work and the miss path stays cheap.
    #[test]
    fn test_decoy_hash_exercises_full_verification() {
        assert!(PasswordHash::new(DECOY_HASH).is_ok());
        assert!(!verify_password("any-password-at-all", DECOY_HASH));
    }
}
