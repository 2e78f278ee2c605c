//! # Transport Selection
//!
//! Where a portal operation is served, and how that decision degrades.
//!
//! ## The Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Transport State Machine                            │
//! │                                                                         │
//! │   probe():  GET /health ok? ──► RemoteProxy                            │
//! │             else direct configured? ──► DirectBackend                  │
//! │             else ──► LocalFixture                                      │
//! │                                                                         │
//! │   per call:                                                            │
//! │                                                                         │
//! │   RemoteProxy ──(Unavailable)──► DirectBackend ──(Unavailable)──►      │
//! │                                                    LocalFixture         │
//! │                                                                         │
//! │   • The failed call is served by the demoted mode, never re-sent       │
//! │     upward. Demotion is one-directional within a session.              │
//! │   • Guard trips (NotFound/AlreadyExists) and validation failures       │
//! │     surface as-is and never demote.                                    │
//! │   • Only a fresh probe() can move the state back up.                   │
//! │                                                                         │
//! │   The state is an explicit value: passed into every call, returned     │
//! │   from every call. No module-level mode singleton.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use atrium_core::registry::Table;
use atrium_db::{Database, JsonMap, Page, PageRequest};
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::error::ClientResult;
use crate::fixture::FixtureTransport;
use crate::remote::RemoteTransport;

// =============================================================================
// Transport State
// =============================================================================

/// Which backend serves portal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// REST proxy over the network.
    RemoteProxy,
    /// Local SQLite backend, same process.
    DirectBackend,
    /// Stateless echo. The floor; it cannot fail with Unavailable.
    LocalFixture,
}

impl TransportMode {
    /// The next mode down the ladder.
    fn next(self) -> TransportMode {
        match self {
            TransportMode::RemoteProxy => TransportMode::DirectBackend,
            TransportMode::DirectBackend | TransportMode::LocalFixture => {
                TransportMode::LocalFixture
            }
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportMode::RemoteProxy => "remote-proxy",
            TransportMode::DirectBackend => "direct-backend",
            TransportMode::LocalFixture => "local-fixture",
        };
        f.write_str(name)
    }
}

/// Explicit, caller-held transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportState {
    mode: TransportMode,
}

impl TransportState {
    pub fn new(mode: TransportMode) -> Self {
        TransportState { mode }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Whether the state sits at the bottom of the ladder.
    pub fn is_floor(&self) -> bool {
        self.mode == TransportMode::LocalFixture
    }

    /// One step down. Idempotent at the floor.
    pub fn demote(self) -> Self {
        TransportState {
            mode: self.mode.next(),
        }
    }
}

// =============================================================================
// Portal Client
// =============================================================================

/// Transport-selecting portal client.
///
/// Operations take the current [`TransportState`] and return the possibly
/// demoted one alongside the result:
///
/// ```rust,ignore
/// let (client, mut state) = PortalClient::connect(config).await;
/// let (state2, record) = client.create(state, Table::Tickets, item).await;
/// state = state2;
/// ```
pub struct PortalClient {
    remote: Option<RemoteTransport>,
    direct: Option<Database>,
    fixture: FixtureTransport,
}

impl PortalClient {
    /// Builds the client's transports and runs the initial selection probe.
    ///
    /// Missing or broken configuration for a transport is non-fatal: that
    /// rung of the ladder is simply skipped.
    pub async fn connect(config: ClientConfig) -> (Self, TransportState) {
        let timeout = config.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let remote = match &config.proxy_url {
            Some(url) => match RemoteTransport::new(url, config.api_key.clone(), timeout) {
                Ok(transport) => Some(transport),
                Err(e) => {
                    warn!(error = %e, "Remote transport disabled");
                    None
                }
            },
            None => None,
        };

        let direct = match config.direct {
            Some(db_config) => {
                match Database::new(db_config, atrium_core::registry::TableRegistry::with_defaults())
                    .await
                {
                    Ok(db) => Some(db),
                    Err(e) => {
                        warn!(error = %e, "Direct backend disabled");
                        None
                    }
                }
            }
            None => None,
        };

        let client = PortalClient {
            remote,
            direct,
            fixture: FixtureTransport,
        };
        let state = client.probe().await;
        (client, state)
    }

    /// Re-runs transport selection from the top of the ladder.
    ///
    /// The only way a session moves back up after a demotion.
    pub async fn probe(&self) -> TransportState {
        if let Some(remote) = &self.remote {
            if remote.health().await.is_ok() {
                info!("Transport selected: remote-proxy");
                return TransportState::new(TransportMode::RemoteProxy);
            }
            debug!("Remote proxy unreachable, trying next mode");
        }

        if self.direct.is_some() {
            info!("Transport selected: direct-backend");
            return TransportState::new(TransportMode::DirectBackend);
        }

        info!("Transport selected: local-fixture");
        TransportState::new(TransportMode::LocalFixture)
    }

    pub async fn create(
        &self,
        state: TransportState,
        table: Table,
        item: JsonMap,
    ) -> (TransportState, ClientResult<Value>) {
        let mut state = state;
        loop {
            let result = match state.mode() {
                TransportMode::RemoteProxy => match self.remote() {
                    Ok(remote) => remote.create(table, &item).await,
                    Err(e) => Err(e),
                },
                TransportMode::DirectBackend => match self.direct() {
                    Ok(db) => db
                        .store()
                        .create(table, item.clone())
                        .await
                        .map_err(Into::into),
                    Err(e) => Err(e),
                },
                TransportMode::LocalFixture => self.fixture.create(table, item.clone()),
            };

            match result {
                Err(e) if e.is_unavailable() && !state.is_floor() => {
                    state = demoted(state, &e);
                }
                other => return (state, other),
            }
        }
    }

    pub async fn get(
        &self,
        state: TransportState,
        table: Table,
        key: &str,
    ) -> (TransportState, ClientResult<Option<Value>>) {
        let mut state = state;
        loop {
            let result = match state.mode() {
                TransportMode::RemoteProxy => match self.remote() {
                    Ok(remote) => remote.get(table, key).await,
                    Err(e) => Err(e),
                },
                TransportMode::DirectBackend => match self.direct() {
                    Ok(db) => db.store().get(table, key).await.map_err(Into::into),
                    Err(e) => Err(e),
                },
                TransportMode::LocalFixture => self.fixture.get(table, key),
            };

            match result {
                Err(e) if e.is_unavailable() && !state.is_floor() => {
                    state = demoted(state, &e);
                }
                other => return (state, other),
            }
        }
    }

    pub async fn update(
        &self,
        state: TransportState,
        table: Table,
        key: &str,
        patch: JsonMap,
    ) -> (TransportState, ClientResult<Value>) {
        let mut state = state;
        loop {
            let result = match state.mode() {
                TransportMode::RemoteProxy => match self.remote() {
                    Ok(remote) => remote.update(table, key, &patch).await,
                    Err(e) => Err(e),
                },
                TransportMode::DirectBackend => match self.direct() {
                    Ok(db) => db
                        .store()
                        .update(table, key, patch.clone())
                        .await
                        .map_err(Into::into),
                    Err(e) => Err(e),
                },
                TransportMode::LocalFixture => self.fixture.update(table, key, patch.clone()),
            };

            match result {
                Err(e) if e.is_unavailable() && !state.is_floor() => {
                    state = demoted(state, &e);
                }
                other => return (state, other),
            }
        }
    }

    pub async fn delete(
        &self,
        state: TransportState,
        table: Table,
        key: &str,
    ) -> (TransportState, ClientResult<()>) {
        let mut state = state;
        loop {
            let result = match state.mode() {
                TransportMode::RemoteProxy => match self.remote() {
                    Ok(remote) => remote.delete(table, key).await,
                    Err(e) => Err(e),
                },
                TransportMode::DirectBackend => match self.direct() {
                    Ok(db) => db.store().delete(table, key).await.map_err(Into::into),
                    Err(e) => Err(e),
                },
                TransportMode::LocalFixture => self.fixture.delete(table, key),
            };

            match result {
                Err(e) if e.is_unavailable() && !state.is_floor() => {
                    state = demoted(state, &e);
                }
                other => return (state, other),
            }
        }
    }

    pub async fn list(
        &self,
        state: TransportState,
        table: Table,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> (TransportState, ClientResult<Page<Value>>) {
        let mut state = state;
        loop {
            let result = match state.mode() {
                TransportMode::RemoteProxy => match self.remote() {
                    Ok(remote) => remote.list(table, limit, cursor.as_deref()).await,
                    Err(e) => Err(e),
                },
                TransportMode::DirectBackend => match self.direct() {
                    Ok(db) => db
                        .store()
                        .scan(
                            table,
                            PageRequest {
                                limit,
                                cursor: cursor.clone(),
                                filter: None,
                            },
                        )
                        .await
                        .map_err(Into::into),
                    Err(e) => Err(e),
                },
                TransportMode::LocalFixture => self.fixture.list(table),
            };

            match result {
                Err(e) if e.is_unavailable() && !state.is_floor() => {
                    state = demoted(state, &e);
                }
                other => return (state, other),
            }
        }
    }

    fn remote(&self) -> ClientResult<&RemoteTransport> {
        self.remote.as_ref().ok_or_else(|| {
            crate::error::ClientError::Unavailable("remote proxy not configured".to_string())
        })
    }

    fn direct(&self) -> ClientResult<&Database> {
        self.direct.as_ref().ok_or_else(|| {
            crate::error::ClientError::Unavailable("direct backend not configured".to_string())
        })
    }
}

/// Logs and applies one demotion step.
fn demoted(state: TransportState, err: &crate::error::ClientError) -> TransportState {
    let next = state.demote();
    warn!(
        from = %state.mode(),
        to = %next.mode(),
        error = %err,
        "Transport demoted"
    );
    next
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_db::DbConfig;
    use serde_json::json;
    use std::time::Duration;

    fn item(pairs: &[(&str, Value)]) -> JsonMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Nothing listens on the discard port, so the remote rung always fails.
    fn dead_proxy_config() -> ClientConfig {
        ClientConfig::default()
            .proxy_url("http://127.0.0.1:9")
            .request_timeout(Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_probe_with_nothing_configured_lands_on_fixture() {
        let (_, state) = PortalClient::connect(ClientConfig::default()).await;
        assert_eq!(state.mode(), TransportMode::LocalFixture);
    }

    #[tokio::test]
    async fn test_probe_prefers_direct_over_fixture() {
        let (_, state) =
            PortalClient::connect(dead_proxy_config().direct(DbConfig::in_memory())).await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);
    }

    #[tokio::test]
    async fn test_failed_remote_call_is_served_by_direct() {
        let (client, _) =
            PortalClient::connect(dead_proxy_config().direct(DbConfig::in_memory())).await;

        // Force the remote mode; the dead proxy must demote, and the same
        // call must be served by the direct backend without an error.
        let state = TransportState::new(TransportMode::RemoteProxy);
        let (state, result) = client
            .create(
                state,
                Table::Clients,
                item(&[("companyName", json!("Acme"))]),
            )
            .await;

        assert_eq!(state.mode(), TransportMode::DirectBackend);
        let record = result.unwrap();
        let id = record["id"].as_str().unwrap();

        // The write really landed on the direct backend.
        let (state, fetched) = client.get(state, Table::Clients, id).await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);
        assert_eq!(fetched.unwrap().unwrap()["companyName"], "Acme");
    }

    #[tokio::test]
    async fn test_demotion_reaches_the_fixture_floor() {
        // Dead proxy, no direct backend: a remote-mode call falls through
        // both rungs and is echoed by the fixture.
        let (client, _) = PortalClient::connect(dead_proxy_config()).await;

        let state = TransportState::new(TransportMode::RemoteProxy);
        let (state, result) = client
            .create(
                state,
                Table::Tickets,
                item(&[("subject", json!("Still works offline"))]),
            )
            .await;

        assert_eq!(state.mode(), TransportMode::LocalFixture);
        assert_eq!(result.unwrap()["subject"], "Still works offline");
    }

    #[tokio::test]
    async fn test_guard_trips_do_not_demote() {
        let (client, state) =
            PortalClient::connect(ClientConfig::default().direct(DbConfig::in_memory())).await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);

        let (state, result) = client.delete(state, Table::Clients, "missing").await;

        // NotFound surfaces as-is; the state stays where it was.
        assert_eq!(state.mode(), TransportMode::DirectBackend);
        assert_eq!(result.unwrap_err().code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_demotion_is_one_directional() {
        let (client, _) =
            PortalClient::connect(dead_proxy_config().direct(DbConfig::in_memory())).await;

        let state = TransportState::new(TransportMode::RemoteProxy);
        let (state, _) = client.list(state, Table::Apps, None, None).await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);

        // Subsequent calls with the returned state stay demoted.
        let (state, _) = client.list(state, Table::Apps, None, None).await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);

        // A fresh probe re-runs selection (the proxy is still dead, so the
        // direct backend is picked again).
        let state = client.probe().await;
        assert_eq!(state.mode(), TransportMode::DirectBackend);
    }

    #[test]
    fn test_demote_is_idempotent_at_the_floor() {
        let state = TransportState::new(TransportMode::LocalFixture);
        assert_eq!(state.demote().mode(), TransportMode::LocalFixture);
    }
}
