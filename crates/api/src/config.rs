//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_DATABASE_URL` - Document store URL: `postgres://...` or
//!   `memory://` (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 8080)
//! - `SHOPFRONT_STORE_TIMEOUT_SECS` - Bound on every store operation (default: 10)
//! - `SHOPFRONT_SKU_PRODUCT_NAME` - Product name resolved by `GET /api/skus`
//!   (default: Wireless Mouse)
//! - `SHOPFRONT_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default bound applied to each store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default product name resolved by the SKU listing.
pub const DEFAULT_SKU_PRODUCT_NAME: &str = "Wireless Mouse";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which document store backend a URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `PostgreSQL` with JSONB documents.
    Postgres,
    /// Process-local store, lost on exit.
    Memory,
}

impl StoreBackend {
    /// Pick a backend from the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unsupported schemes.
    pub fn from_url(var_name: &str, url: &str) -> Result<Self, ConfigError> {
        let scheme = url.split_once("://").map_or("", |(scheme, _)| scheme);
        match scheme {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("unsupported store scheme '{scheme}' (expected postgres:// or memory://)"),
            )),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Document store URL (may contain a password)
    pub database_url: SecretString,
    /// Backend selected by the URL scheme
    pub store_backend: StoreBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bound applied to every individual store operation
    pub store_timeout: Duration,
    /// Product name resolved by the SKU correlation endpoint
    pub sku_product_name: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &"[REDACTED]")
            .field("store_backend", &self.store_backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("store_timeout", &self.store_timeout)
            .field("sku_product_name", &self.sku_product_name)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOPFRONT_DATABASE_URL")?;
        let store_backend =
            StoreBackend::from_url("SHOPFRONT_DATABASE_URL", database_url.expose_secret())?;
        let host = parse_env("SHOPFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("SHOPFRONT_PORT", "8080")?;
        let store_timeout = parse_timeout("SHOPFRONT_STORE_TIMEOUT_SECS")?;
        let sku_product_name =
            get_env_or_default("SHOPFRONT_SKU_PRODUCT_NAME", DEFAULT_SKU_PRODUCT_NAME);
        let log_format = parse_log_format(&get_env_or_default("SHOPFRONT_LOG_FORMAT", "text"))?;

        Ok(Self {
            database_url,
            store_backend,
            host,
            port,
            store_timeout,
            sku_product_name,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration for an in-memory store, used by tests and local tooling.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: SecretString::from("memory://"),
            store_backend: StoreBackend::Memory,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            sku_product_name: DEFAULT_SKU_PRODUCT_NAME.to_string(),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the store timeout, rejecting zero.
fn parse_timeout(key: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_env(key, "10")?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_LOG_FORMAT".to_string(),
            format!("expected 'text' or 'json', got '{other}'"),
        )),
    }
}
