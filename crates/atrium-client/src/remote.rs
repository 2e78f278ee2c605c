//! # Remote-Proxy Transport
//!
//! Serves portal operations over the REST proxy.
//!
//! ## Wire Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Proxy Transport                             │
//! │                                                                         │
//! │  create  POST   /api/<entity>            x-api-key on every request    │
//! │  get     GET    /api/<entity>/{id}                                     │
//! │  update  PUT    /api/<entity>/{id}                                     │
//! │  delete  DELETE /api/<entity>/{id}                                     │
//! │  list    GET    /api/<entity>?limit=&cursor=                           │
//! │  probe   GET    /health                  unauthenticated               │
//! │                                                                         │
//! │  Every response is the envelope:                                       │
//! │  { "success": bool, "data": ..., "error": ..., "code": ...,            │
//! │    "timestamp": ... }                                                  │
//! │                                                                         │
//! │  Envelope codes map back onto the client taxonomy; transport-level     │
//! │  failures (connect, timeout) become Unavailable and demote.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use atrium_core::registry::Table;
use atrium_db::{JsonMap, Page};

use crate::error::{ClientError, ClientResult};

/// URL path segment for an entity collection.
fn entity_path(table: Table) -> &'static str {
    match table {
        Table::Clients => "clients",
        Table::Tickets => "tickets",
        Table::Apps => "apps",
        Table::FeatureRequests => "feature-requests",
        Table::KnowledgeBase => "knowledge-base",
        Table::Users => "users",
        Table::AdminUsers => "admin-users",
        Table::RecentUpdates => "recent-updates",
        Table::PopularTopics => "popular-topics",
        Table::Invoices => "invoices",
        Table::QrCodes => "qr-codes",
    }
}

/// The proxy's response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP client for the REST proxy.
#[derive(Debug, Clone)]
pub struct RemoteTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::OperationFailed(e.to_string()))?;

        Ok(RemoteTransport {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Probes the proxy's unauthenticated health endpoint.
    pub async fn health(&self) -> ClientResult<()> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Probing proxy health");

        let response = self.http.get(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Unavailable(format!(
                "health probe returned {}",
                response.status()
            )))
        }
    }

    pub async fn create(&self, table: Table, item: &JsonMap) -> ClientResult<Value> {
        let url = self.collection_url(table);
        let response = self.authed(self.http.post(&url)).json(item).send().await?;
        let data = unwrap_envelope(response).await?;
        data.ok_or_else(|| ClientError::OperationFailed("empty create response".to_string()))
    }

    pub async fn get(&self, table: Table, key: &str) -> ClientResult<Option<Value>> {
        let url = self.item_url(table, key);
        let response = self.authed(self.http.get(&url)).send().await?;

        match unwrap_envelope(response).await {
            Ok(data) => Ok(data),
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update(&self, table: Table, key: &str, patch: &JsonMap) -> ClientResult<Value> {
        let url = self.item_url(table, key);
        let response = self.authed(self.http.put(&url)).json(patch).send().await?;
        let data = unwrap_envelope(response).await?;
        data.ok_or_else(|| ClientError::OperationFailed("empty update response".to_string()))
    }

    pub async fn delete(&self, table: Table, key: &str) -> ClientResult<()> {
        let url = self.item_url(table, key);
        let response = self.authed(self.http.delete(&url)).send().await?;
        unwrap_envelope(response).await?;
        Ok(())
    }

    pub async fn list(
        &self,
        table: Table,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> ClientResult<Page<Value>> {
        let url = self.collection_url(table);
        let mut request = self.authed(self.http.get(&url));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request.send().await?;
        let data = unwrap_envelope(response)
            .await?
            .ok_or_else(|| ClientError::OperationFailed("empty list response".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }

    fn collection_url(&self, table: Table) -> String {
        format!("{}/api/{}", self.base_url, entity_path(table))
    }

    fn item_url(&self, table: Table, key: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, entity_path(table), key)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }
}

/// Unwraps the response envelope into data or a taxonomy error.
async fn unwrap_envelope(response: reqwest::Response) -> ClientResult<Option<Value>> {
    let status = response.status();
    let envelope: Envelope = response
        .json()
        .await
        .map_err(|e| ClientError::OperationFailed(format!("bad envelope ({status}): {e}")))?;

    if envelope.success {
        Ok(envelope.data)
    } else {
        let code = envelope.code.as_deref().unwrap_or("OPERATION_FAILED");
        let message = envelope.error.unwrap_or_else(|| status.to_string());
        Err(ClientError::from_envelope(code, message))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_paths_are_kebab_case() {
        assert_eq!(entity_path(Table::FeatureRequests), "feature-requests");
        assert_eq!(entity_path(Table::QrCodes), "qr-codes");
        assert_eq!(entity_path(Table::Tickets), "tickets");
    }

    #[test]
    fn test_urls_have_no_double_slash() {
        let transport =
            RemoteTransport::new("http://localhost:8080/", None, Duration::from_secs(1)).unwrap();

        assert_eq!(
            transport.collection_url(Table::Tickets),
            "http://localhost:8080/api/tickets"
        );
        assert_eq!(
            transport.item_url(Table::Tickets, "t-1"),
            "http://localhost:8080/api/tickets/t-1"
        );
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_unavailable() {
        // Nothing listens on a discard port; the connect error must classify
        // as Unavailable so the caller demotes.
        let transport =
            RemoteTransport::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();

        let err = transport.health().await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
