//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database
//! - `CERTDESK_DATABASE_URL` - Full `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! When neither URL is set, the connection is configured from these parts
//! (passed to the driver as-is, so the password needs no URL escaping):
//! - `CERTDESK_DB_HOST` - Database host (default: localhost)
//! - `CERTDESK_DB_PORT` - Database port (default: 5432)
//! - `CERTDESK_DB_USER` - Database user (default: postgres)
//! - `CERTDESK_DB_PASSWORD` - Database password (optional)
//! - `CERTDESK_DB_NAME` - Database name (default: customerdb)
//!
//! ## Optional
//! - `CERTDESK_HOST` - Bind address (default: 0.0.0.0)
//! - `CERTDESK_PORT` - Listen port (default: 8080)
//! - `CERTDESK_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `CERTDESK_DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)
//! - `CERTDESK_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value cannot be parsed (name, reason).
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// certdesk server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of requests traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Where the database lives.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// A full `PostgreSQL` connection URL (may contain a password).
    Url(SecretString),
    /// Individual connection parameters.
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<SecretString>,
        name: String,
    },
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL or parameters
    pub target: DatabaseTarget,
    /// Maximum pool size
    pub max_connections: u32,
    /// How long a request waits for a pooled connection
    pub acquire_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("CERTDESK_HOST", "0.0.0.0")?,
            port: parse_env_or_default("CERTDESK_PORT", "8080")?,
            database: DatabaseConfig::from_env()?,
            log_json: get_optional_env("CERTDESK_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load the database settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let target = match get_optional_env("CERTDESK_DATABASE_URL")
            .or_else(|| get_optional_env("DATABASE_URL"))
        {
            Some(url) => DatabaseTarget::Url(SecretString::from(url)),
            None => DatabaseTarget::Parts {
                host: get_env_or_default("CERTDESK_DB_HOST", "localhost"),
                port: parse_env_or_default("CERTDESK_DB_PORT", "5432")?,
                user: get_env_or_default("CERTDESK_DB_USER", "postgres"),
                password: get_optional_env("CERTDESK_DB_PASSWORD").map(SecretString::from),
                name: get_env_or_default("CERTDESK_DB_NAME", "customerdb"),
            },
        };

        let max_connections = parse_env_or_default("CERTDESK_DB_MAX_CONNECTIONS", "10")?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CERTDESK_DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let acquire_timeout_secs: u64 =
            parse_env_or_default("CERTDESK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

        Ok(Self {
            target,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }

    /// Driver connect options for the configured target.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` if the URL cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.target {
            DatabaseTarget::Url(url) => url.expose_secret().parse(),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                name,
            } => {
                let options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .database(name);
                Ok(match password {
                    Some(password) => options.password(password.expose_secret()),
                    None => options,
                })
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
