//! # Client Configuration
//!
//! What the portal client needs to know about its possible transports.
//!
//! Missing configuration here is never fatal: an absent proxy URL just means
//! the remote mode is never selected, an absent database path means the
//! direct mode is never selected, and with neither the client runs on the
//! local fixture. This is deliberately the opposite of the server, where a
//! missing secret aborts startup.

use std::time::Duration;

use atrium_db::DbConfig;

/// Portal client configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = ClientConfig::default()
///     .proxy_url("https://portal.example.com")
///     .api_key("k-123");
/// let (client, state) = PortalClient::connect(config).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL of the REST proxy. `None` disables the remote mode.
    pub proxy_url: Option<String>,

    /// Static API key sent as `x-api-key` on every proxy request.
    pub api_key: Option<String>,

    /// Direct-backend database configuration. `None` disables the direct
    /// mode.
    pub direct: Option<DbConfig>,

    /// Request timeout for proxy calls. `None` uses [`DEFAULT_REQUEST_TIMEOUT`].
    pub request_timeout: Option<Duration>,
}

/// Default timeout for remote-proxy requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl ClientConfig {
    /// Reads configuration from the process environment.
    ///
    /// | Variable           | Meaning                          |
    /// |--------------------|----------------------------------|
    /// | `ATRIUM_PROXY_URL` | REST proxy base URL              |
    /// | `ATRIUM_API_KEY`   | static proxy API key             |
    /// | `ATRIUM_DB_PATH`   | direct-backend SQLite file path  |
    pub fn from_env() -> Self {
        ClientConfig {
            proxy_url: std::env::var("ATRIUM_PROXY_URL").ok(),
            api_key: std::env::var("ATRIUM_API_KEY").ok(),
            direct: std::env::var("ATRIUM_DB_PATH").ok().map(DbConfig::new),
            request_timeout: None,
        }
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn direct(mut self, config: DbConfig) -> Self {
        self.direct = Some(config);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_disables_remote_and_direct() {
        let config = ClientConfig::default();
        assert!(config.proxy_url.is_none());
        assert!(config.direct.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .proxy_url("http://localhost:8080")
            .api_key("k-123");

        assert_eq!(config.proxy_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
    }
}
