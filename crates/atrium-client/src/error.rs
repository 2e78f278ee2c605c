//! # Client Error Types
//!
//! The taxonomy portal-client callers see, whichever transport served the
//! call.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Caller Input   │  │  Guard Trips    │  │     Reachability        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  AlreadyExists  │  │  Unavailable            │ │
//! │  │                 │  │  NotFound       │  │  (the ONLY demotion     │ │
//! │  │                 │  │                 │  │   signal)               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  OperationFailed is the catch-all with the original message attached.  │
//! │  Guard trips and validation failures are never retried anywhere.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use atrium_core::error::ValidationError;
use atrium_db::StoreError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error covering every transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller input failed the declarative checks. Rejected before any
    /// transport is touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The create guard tripped on the serving backend.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: String, key: String },

    /// The existence guard tripped on the serving backend.
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// The serving transport could not be reached.
    ///
    /// The only variant that demotes the transport state; the failed call is
    /// served by the next mode down, never re-sent to the failed one.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// Catch-all, original message attached.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl ClientError {
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        ClientError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, key: impl Into<String>) -> Self {
        ClientError::AlreadyExists {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Whether this failure should demote the transport state.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ClientError::Unavailable(_))
    }

    /// Stable machine-readable code, aligned with the HTTP envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::AlreadyExists { .. } => "ALREADY_EXISTS",
            ClientError::NotFound { .. } => "NOT_FOUND",
            ClientError::Unavailable(_) => "BACKEND_UNAVAILABLE",
            ClientError::OperationFailed(_) => "OPERATION_FAILED",
        }
    }

    /// Rebuilds an error from an envelope code + message, as received from
    /// the remote proxy.
    pub(crate) fn from_envelope(code: &str, message: String) -> Self {
        match code {
            "NOT_FOUND" => ClientError::NotFound {
                entity: "record".to_string(),
                key: message,
            },
            "ALREADY_EXISTS" => ClientError::AlreadyExists {
                entity: "record".to_string(),
                key: message,
            },
            "BACKEND_UNAVAILABLE" => ClientError::Unavailable(message),
            _ => ClientError::OperationFailed(message),
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

/// The direct backend raises the storage taxonomy; map it one-to-one.
impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { table, key } => ClientError::AlreadyExists {
                entity: table,
                key,
            },
            StoreError::NotFound { table, key } => ClientError::NotFound { entity: table, key },
            StoreError::Unavailable(msg) => ClientError::Unavailable(msg),
            StoreError::OperationFailed(msg) => ClientError::OperationFailed(msg),
        }
    }
}

/// Classify reqwest failures: anything that never produced a response is a
/// reachability problem; a response we could not digest is not.
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ClientError::Unavailable(err.to_string())
        } else {
            ClientError::OperationFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::OperationFailed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_demotes() {
        assert!(ClientError::Unavailable("refused".into()).is_unavailable());

        assert!(!ClientError::not_found("Tickets", "t-1").is_unavailable());
        assert!(!ClientError::already_exists("Clients", "c-1").is_unavailable());
        assert!(!ClientError::OperationFailed("x".into()).is_unavailable());
    }

    #[test]
    fn test_store_errors_map_one_to_one() {
        let err: ClientError = StoreError::not_found("Tickets", "t-1").into();
        assert_eq!(err.code(), "NOT_FOUND");

        let err: ClientError = StoreError::Unavailable("pool closed".into()).into();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_envelope_codes_round_trip() {
        let err = ClientError::from_envelope("BACKEND_UNAVAILABLE", "down".into());
        assert!(err.is_unavailable());

        let err = ClientError::from_envelope("SOMETHING_ELSE", "weird".into());
        assert_eq!(err.code(), "OPERATION_FAILED");
    }
}
