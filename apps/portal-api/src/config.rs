//! Server configuration.
//!
//! Loaded from environment variables. Unlike the client, the server refuses
//! to start without its secrets: a missing API key or JWT secret is a fatal
//! configuration error, never silently defaulted.

use std::path::PathBuf;

/// Portal API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// SQLite database file path.
    pub database_path: PathBuf,

    /// Static API key expected in the `x-api-key` header on `/api` routes.
    pub api_key: String,

    /// JWT signing secret.
    pub jwt_secret: String,

    /// JWT token lifetime in seconds.
    pub jwt_lifetime_secs: i64,
}

impl ApiConfig {
    /// Loads configuration from the process environment.
    ///
    /// | Variable                   | Default       | Required |
    /// |----------------------------|---------------|----------|
    /// | `PORTAL_PORT`              | `8080`        | no       |
    /// | `PORTAL_DB_PATH`           | `./atrium.db` | no       |
    /// | `PORTAL_API_KEY`           | -             | yes      |
    /// | `PORTAL_JWT_SECRET`        | -             | yes      |
    /// | `PORTAL_JWT_LIFETIME_SECS` | `3600`        | no       |
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|var| std::env::var(var).ok())
    }

    /// Loads configuration through a lookup function (env in production,
    /// a map in tests).
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORTAL_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORTAL_PORT".to_string()))?,
            None => 8080,
        };

        let jwt_lifetime_secs = match lookup("PORTAL_JWT_LIFETIME_SECS") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORTAL_JWT_LIFETIME_SECS".to_string()))?,
            None => 3600,
        };

        Ok(ApiConfig {
            port,
            database_path: lookup("PORTAL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./atrium.db")),
            api_key: lookup("PORTAL_API_KEY")
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingRequired("PORTAL_API_KEY".to_string()))?,
            jwt_secret: lookup("PORTAL_JWT_SECRET")
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingRequired("PORTAL_JWT_SECRET".to_string()))?,
            jwt_lifetime_secs,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            pairs
                .iter()
                .find(|(k, _)| *k == var)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = ApiConfig::load_from(lookup(&[("PORTAL_JWT_SECRET", "s")]));
        assert!(matches!(result, Err(ConfigError::MissingRequired(ref v)) if v == "PORTAL_API_KEY"));
    }

    #[test]
    fn test_missing_jwt_secret_is_fatal() {
        let result = ApiConfig::load_from(lookup(&[("PORTAL_API_KEY", "k")]));
        assert!(
            matches!(result, Err(ConfigError::MissingRequired(ref v)) if v == "PORTAL_JWT_SECRET")
        );
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let result = ApiConfig::load_from(lookup(&[
            ("PORTAL_API_KEY", "k"),
            ("PORTAL_JWT_SECRET", ""),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_defaults_apply() {
        let config = ApiConfig::load_from(lookup(&[
            ("PORTAL_API_KEY", "k"),
            ("PORTAL_JWT_SECRET", "s"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_lifetime_secs, 3600);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = ApiConfig::load_from(lookup(&[
            ("PORTAL_API_KEY", "k"),
            ("PORTAL_JWT_SECRET", "s"),
            ("PORTAL_PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
