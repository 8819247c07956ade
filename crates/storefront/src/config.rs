//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a local storefront against the
//! public commerce API.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_API_URL` - Commerce REST API base URL (default: <https://ecommerce.routemisr.com>)
//! - `STOREFRONT_API_TIMEOUT_SECS` - Per-request API timeout (default: 15)
//! - `STOREFRONT_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit auth form posts (default: true)
//! - `STOREFRONT_LOG_JSON` - Emit JSON log lines (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Default commerce API the storefront talks to.
pub const DEFAULT_API_URL: &str = "https://ecommerce.routemisr.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront (no trailing slash)
    pub base_url: String,
    /// Commerce REST API configuration
    pub api: ApiConfig,
    /// Whether auth form posts are rate limited per client IP
    pub rate_limit: bool,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Commerce REST API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://ecommerce.routemisr.com` (no trailing slash)
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// How long catalog responses stay cached
    pub catalog_cache_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            catalog_cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Sentry configuration.
///
/// Implements `Debug` manually to redact the DSN (it embeds the project key).
#[derive(Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<SecretString>,
    /// Environment tag (e.g. "production")
    pub environment: Option<String>,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .finish()
    }
}

impl SentryConfig {
    /// Expose the DSN for `sentry::init`.
    #[must_use]
    pub fn dsn(&self) -> Option<&str> {
        self.dsn.as_ref().map(|dsn| dsn.expose_secret())
    }
}

impl StorefrontConfig {
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = parse_env("STOREFRONT_PORT", 3000_u16)?;
        let base_url = get_url("STOREFRONT_BASE_URL", "http://localhost:3000")?;

        let api = ApiConfig {
            base_url: get_url("STOREFRONT_API_URL", DEFAULT_API_URL)?,
            timeout: Duration::from_secs(parse_env("STOREFRONT_API_TIMEOUT_SECS", 15_u64)?),
            catalog_cache_ttl: Duration::from_secs(parse_env(
                "STOREFRONT_CATALOG_CACHE_TTL_SECS",
                300_u64,
            )?),
        };

        let rate_limit = parse_bool("STOREFRONT_RATE_LIMIT", true)?;
        let log_json = parse_bool("STOREFRONT_LOG_JSON", false)?;

        let sentry = SentryConfig {
            dsn: get_optional_env("SENTRY_DSN").map(SecretString::from),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
        };

        Ok(Self {
            host,
            port,
            base_url,
            api,
            rate_limit,
            log_json,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls the `Secure` cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig::default(),
            rate_limit: true,
            log_json: false,
            sentry: SentryConfig::default(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn parse_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool_value(key, &raw))
}

fn parse_bool_value(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Get a URL variable, validated and stripped of any trailing slash.
fn get_url(key: &str, default: &str) -> Result<String, ConfigError> {
    normalize_url(key, &get_env_or_default(key, default))
}

fn normalize_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL must have a host".to_string(),
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
