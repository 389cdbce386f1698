//! Frontend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOGIX_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOGIX_PORT` - Listen port (default: 3000)
//! - `CATALOGIX_API_BASE_URL` - Catalog backend origin (default: <http://127.0.0.1:8080>)
//! - `CATALOGIX_USERS_URL` - User service base URL (default: the API base URL)
//! - `CATALOGIX_PRODUCTS_URL` - Product service base URL (default: the API base URL)
//! - `CATALOGIX_CURRENCY_SYMBOL` - Symbol prefixed to prices (default: ₹)
//! - `CATALOGIX_LOG_JSON` - Emit JSON logs when set to anything but `0`/`false`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

use crate::api::ApiEndpoints;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Frontend application configuration.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog backend service URLs
    pub endpoints: ApiEndpoints,
    /// Currency symbol rendered before prices
    pub currency_symbol: String,
    /// Structured JSON log output
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl FrontendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parsed("CATALOGIX_HOST", DEFAULT_HOST)?;
        let port = env.parsed("CATALOGIX_PORT", DEFAULT_PORT)?;

        let base = parse_url(
            "CATALOGIX_API_BASE_URL",
            &env.or_default("CATALOGIX_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let endpoints = ApiEndpoints {
            users: env.url("CATALOGIX_USERS_URL")?.unwrap_or_else(|| base.clone()),
            products: env.url("CATALOGIX_PRODUCTS_URL")?.unwrap_or(base),
        };

        let currency_symbol = env.or_default("CATALOGIX_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL);
        let log_json = env
            .optional("CATALOGIX_LOG_JSON")
            .is_some_and(|v| !matches!(v.to_lowercase().as_str(), "0" | "false"));

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            endpoints,
            currency_symbol,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
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

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn url(&self, key: &str) -> Result<Option<Url>, ConfigError> {
        self.optional(key).map(|v| parse_url(key, &v)).transpose()
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<FrontendConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FrontendConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.endpoints.users.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.endpoints.users, config.endpoints.products);
        assert_eq!(config.currency_symbol, "₹");
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_service_overrides() {
        let config = load(&[
            ("CATALOGIX_API_BASE_URL", "http://gateway:9000"),
            ("CATALOGIX_PRODUCTS_URL", "http://products:8082/api"),
        ])
        .unwrap();
        assert_eq!(config.endpoints.users.as_str(), "http://gateway:9000/");
        assert_eq!(
            config.endpoints.products_url("products"),
            "http://products:8082/api/products"
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("CATALOGIX_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOGIX_PORT"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let err = load(&[("CATALOGIX_USERS_URL", "ftp://users")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOGIX_USERS_URL")
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("CATALOGIX_HOST", "  "), ("CATALOGIX_CURRENCY_SYMBOL", "")]).unwrap();
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn test_log_json_flag() {
        assert!(load(&[("CATALOGIX_LOG_JSON", "1")]).unwrap().log_json);
        assert!(!load(&[("CATALOGIX_LOG_JSON", "false")]).unwrap().log_json);
    }
}
