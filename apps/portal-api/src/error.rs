//! # API Error Types and Response Envelope
//!
//! Every response leaving this server is the same envelope, success or not.
//!
//! ## Envelope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Response Envelope                                 │
//! │                                                                         │
//! │  Success:  { "success": true,  "data": ..., "timestamp": ... }         │
//! │  Failure:  { "success": false, "error": "...", "code": "...",          │
//! │              "details": [{field, message}, ...]?, "timestamp": ... }   │
//! │                                                                         │
//! │  Status map:                                                           │
//! │    400 VALIDATION_ERROR      422-style caller input problems           │
//! │    401 UNAUTHORIZED          bad/missing api key or token              │
//! │    404 NOT_FOUND             existence guard tripped                   │
//! │    409 ALREADY_EXISTS        create guard tripped                      │
//! │    503 BACKEND_UNAVAILABLE   storage unreachable                       │
//! │    500 OPERATION_FAILED      everything else                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use atrium_core::error::{FieldError, ValidationError};
use atrium_db::StoreError;

use crate::extract::Json;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error covering every handler failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input failed the declarative checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage layer failure, guard trips included.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Missing or invalid api key / bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl ApiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Store(e) => e.code(),
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::OperationFailed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// The uniform response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,

    /// Per-field violations, present on validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    pub timestamp: DateTime<Utc>,
}

/// Wraps a success payload in the envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data: Some(data),
        error: None,
        code: None,
        details: None,
        timestamp: Utc::now(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let details = match &self {
            ApiError::Validation(e) => Some(e.errors.clone()),
            _ => None,
        };

        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            error: Some(self.to_string()),
            code: Some(code),
            details,
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_map() {
        let err: ApiError = StoreError::not_found("Clients", "c-1").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");

        let err: ApiError = StoreError::already_exists("Clients", "c-1").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = StoreError::Unavailable("down".into()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::Unauthorized("bad key".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_error_carries_details() {
        let err: ApiError = ValidationError::single("subject", "subject is required").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(&ok(serde_json::json!({"id": "c-1"})).0).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], "c-1");
        assert!(body.get("error").is_none());
        assert!(body.get("timestamp").is_some());
    }
}
