//! Configuration management for the photobooth server.
//!
//! Loads configuration from environment variables (after reading `.env` when
//! present) with sensible defaults for everything but the database URL and
//! the token secret.

use photobooth_core::TokenConfig;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// Booth token signing configuration
    pub tokens: TokenConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Metrics server host (for Prometheus scraping)
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// `host:port` of the API listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Socket address of the metrics listener.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the host is not an IP address.
    pub fn metrics_address(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.metrics_host, self.metrics_port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: "METRICS_HOST",
            value: raw,
        })
    }
}

/// `PostgreSQL` configuration
#[derive(Clone)]
pub struct PostgresConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Drop the credentials from a connection URL for logging.
#[must_use]
pub fn redact_url(url: &str) -> String {
    match (url.split_once("://"), url.rsplit_once('@')) {
        (Some((scheme, _)), Some((_, host))) => format!("{scheme}://***@{host}"),
        _ => url.to_string(),
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `DATABASE_URL` or `BOOTH_TOKEN_SECRET` is
    /// missing, or any variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let ttl = vars
            .parse::<i64>("BOOTH_TOKEN_TTL_SECS")?
            .map(|secs| {
                if secs > 0 {
                    Ok(chrono::Duration::seconds(secs))
                } else {
                    Err(ConfigError::Invalid {
                        name: "BOOTH_TOKEN_TTL_SECS",
                        value: secs.to_string(),
                    })
                }
            })
            .transpose()?;

        let mut tokens = TokenConfig::new(vars.required("BOOTH_TOKEN_SECRET")?);
        if let Some(ttl) = ttl {
            tokens = tokens.with_ttl(ttl);
        }

        Ok(Self {
            server: ServerConfig {
                host: vars.get("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: vars.parse("APP_PORT")?.unwrap_or(8080),
                metrics_host: vars
                    .get("METRICS_HOST")
                    .unwrap_or_else(|| "0.0.0.0".to_string()),
                metrics_port: vars.parse("METRICS_PORT")?.unwrap_or(9090),
                shutdown_timeout: Duration::from_secs(
                    vars.parse("SHUTDOWN_TIMEOUT")?.unwrap_or(30),
                ),
            },
            postgres: PostgresConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse("DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
                min_connections: vars.parse("DATABASE_MIN_CONNECTIONS")?.unwrap_or(1),
                connect_timeout: Duration::from_secs(
                    vars.parse("DATABASE_CONNECT_TIMEOUT")?.unwrap_or(30),
                ),
            },
            tokens,
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parse<T: std::str::FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(name)
            .map(|value| {
                value.trim().parse().map_err(|_| ConfigError::Invalid {
                    name,
                    value: value.clone(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://booth:secret@db:5432/photobooth"),
        ("BOOTH_TOKEN_SECRET", "s3cret"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(
            config.server.metrics_address().unwrap(),
            "0.0.0.0:9090".parse().unwrap()
        );
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(config.postgres.max_connections, 10);
        assert_eq!(config.postgres.min_connections, 1);
        assert_eq!(config.tokens.ttl, None);
    }

    #[test]
    fn test_required_variables() {
        assert_eq!(
            load(&REQUIRED[..1]).unwrap_err(),
            ConfigError::Missing("BOOTH_TOKEN_SECRET")
        );
        assert_eq!(
            load(&[("BOOTH_TOKEN_SECRET", "s3cret"), ("DATABASE_URL", "  ")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn test_overrides_and_ttl() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("APP_PORT", "3000"),
            ("DATABASE_MAX_CONNECTIONS", "25"),
            ("BOOTH_TOKEN_TTL_SECS", "86400"),
        ]);
        let config = load(&pairs).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.postgres.max_connections, 25);
        assert_eq!(config.tokens.ttl, Some(chrono::Duration::days(1)));
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_PORT", "eighty"));
        assert_eq!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid {
                name: "APP_PORT",
                value: "eighty".into()
            }
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BOOTH_TOKEN_TTL_SECS", "0"));
        assert!(matches!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid { name: "BOOTH_TOKEN_TTL_SECS", .. }
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = load(&REQUIRED).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret@"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("postgres://***@db:5432/photobooth"));
    }
}
