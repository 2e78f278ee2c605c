//! # HTTP Routes
//!
//! One collection per entity under `/api`, plus auth and health.
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Route Map                                      │
//! │                                                                         │
//! │  GET  /health                      unauthenticated (probe target)      │
//! │  POST /auth/login                  username/password → JWT             │
//! │  GET  /auth/verify                 bearer token → identity echo        │
//! │                                                                         │
//! │  /api/* (x-api-key required)                                           │
//! │  GET/POST        /api/<entity>           list (limit/cursor) / create  │
//! │  GET/PUT/DELETE  /api/<entity>/{id}      read / update / delete        │
//! │                                                                         │
//! │  Entity extras:                                                        │
//! │  POST /api/tickets/{id}/replies          append to the reply thread    │
//! │  POST /api/feature-requests/{id}/vote    upvote                        │
//! │  POST /api/popular-topics/{id}/view      bump the view counter         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod apps;
pub mod auth;
pub mod clients;
pub mod content;
pub mod feature_requests;
pub mod invoices;
pub mod knowledge_base;
pub mod qr_codes;
pub mod tickets;
pub mod users;

use axum::extract::State;
use axum::middleware;
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::json;

use atrium_db::{PageRequest, QueryOptions, StoreError};

use crate::error::{ok, ApiResult, Envelope};
use crate::extract::Json;
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> axum::Router {
    let api = axum::Router::new()
        .merge(clients::routes())
        .merge(tickets::routes())
        .merge(apps::routes())
        .merge(feature_requests::routes())
        .merge(knowledge_base::routes())
        .merge(users::routes())
        .merge(content::routes())
        .merge(invoices::routes())
        .merge(qr_codes::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_api_key,
        ));

    axum::Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .nest("/api", api)
        .with_state(state)
}

/// Common list query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Scopes list endpoints that support a per-client index.
    pub client_id: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            limit: self.limit,
            cursor: self.cursor.clone(),
            filter: None,
        }
    }

    pub fn query(&self) -> QueryOptions {
        QueryOptions {
            limit: self.limit,
            cursor: self.cursor.clone(),
            ..Default::default()
        }
    }
}

/// Unauthenticated health endpoint; the transport probe targets this.
async fn health(State(state): State<AppState>) -> ApiResult<Json<Envelope<serde_json::Value>>> {
    if state.db.health_check().await {
        Ok(ok(json!({ "status": "healthy" })))
    } else {
        Err(StoreError::Unavailable("database unreachable".to_string()).into())
    }
}

// =============================================================================
// Endpoint Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use atrium_core::registry::TableRegistry;
    use atrium_db::{Database, DbConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_router() -> axum::Router {
        let db = Database::new(DbConfig::in_memory(), TableRegistry::with_defaults())
            .await
            .unwrap();
        let config = ApiConfig::load_from(|var| match var {
            "PORTAL_API_KEY" => Some("test-key".to_string()),
            "PORTAL_JWT_SECRET" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        router(AppState::new(db, config))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_auth() {
        let router = test_router().await;

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_api_without_key_is_unauthorized() {
        let router = test_router().await;

        let response = router
            .oneshot(Request::get("/api/clients").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_api_with_wrong_key_is_unauthorized() {
        let router = test_router().await;

        let response = router
            .oneshot(
                Request::get("/api/clients")
                    .header("x-api-key", "wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_and_fetch_through_the_wire() {
        let router = test_router().await;

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/clients")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"companyName":"Acme Corp"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["companyName"], "Acme Corp");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::get(format!("/api/clients/{id}"))
                    .header("x-api-key", "test-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_validation_failure_is_enveloped() {
        let router = test_router().await;

        let response = router
            .oneshot(
                Request::post("/api/clients")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"companyName":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "companyName");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let router = test_router().await;

        let response = router
            .oneshot(
                Request::delete("/api/clients/missing")
                    .header("x-api-key", "test-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_ticket_create_forces_defaults_over_the_wire() {
        let router = test_router().await;

        let response = router
            .oneshot(
                Request::post("/api/tickets")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"subject":"Export broken","priority":"High"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "Open");
        assert_eq!(body["data"]["replies"], serde_json::json!([]));
        assert!(body["data"]["ticketNumber"]
            .as_str()
            .unwrap()
            .starts_with("TKT-"));
    }

    #[tokio::test]
    async fn test_undeserializable_body_is_enveloped() {
        let router = test_router().await;

        // "Bogus" is not a TicketPriority; the rejection must still wear the
        // envelope instead of axum's plain-text 422.
        let response = router
            .oneshot(
                Request::post("/api/tickets")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"subject":"Export broken","priority":"Bogus"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_admin_user_update_over_the_wire() {
        let router = test_router().await;

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/admin-users")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"ops-admin","password":"ops-password"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::put(format!("/api/admin-users/{id}"))
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"ops@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["email"], "ops@example.com");
        assert_eq!(body["data"]["username"], "ops-admin");
        assert!(body["data"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_login_and_verify() {
        let router = test_router().await;

        // Seed a user through the API (password is hashed server-side).
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"jfields","password":"hunter2-long"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"jfields","password":"hunter2-long","userType":"client"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::get("/auth/verify")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["username"], "jfields");
        assert_eq!(body["data"]["userType"], "client");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let router = test_router().await;

        router
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"jfields","password":"hunter2-long"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"jfields","password":"wrong","userType":"client"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejection_does_not_reveal_which_accounts_exist() {
        let router = test_router().await;

        router
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"jfields","password":"hunter2-long"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        let attempt = |username: &str| {
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"username":"{username}","password":"wrong","userType":"client"}}"#
                )))
                .unwrap()
        };

        let wrong_password = router.clone().oneshot(attempt("jfields")).await.unwrap();
        let unknown_user = router.oneshot(attempt("nobody")).await.unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

        // Identical rejection bodies either way.
        let a = body_json(wrong_password).await;
        let b = body_json(unknown_user).await;
        assert_eq!(a["error"], b["error"]);
        assert_eq!(a["code"], b["code"]);
    }
}
