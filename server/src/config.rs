//! Configuration management for the server.
//!
//! Loaded from environment variables (after `.env`, via `dotenvy`) with
//! defaults for everything except credentials.

use algorithm_hub_auth::{AuthConfig, AuthError};
use algorithm_hub_core::lifecycle::DEFAULT_TABLE;
use algorithm_hub_postgrest::PostgrestConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,algorithm_hub=debug,tower_http=debug";

/// Configuration could not be loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Record store settings
    pub store: StoreConfig,
    /// Bearer token settings
    pub auth: AuthSettings,
    /// Browser origins allowed by CORS (`BACKEND_CORS_ORIGINS`, comma separated)
    pub cors_origins: Vec<String>,
    /// Deployment name, e.g. `development` or `production`
    pub environment: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Tracing filter directive
    pub log_level: String,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
    /// Seconds to wait for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
}

/// `PostgREST` record store configuration.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL
    pub url: String,
    /// Public API key
    pub api_key: String,
    /// Service-role key
    pub service_key: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Table holding lifecycle records
    pub table: String,
}

/// Bearer token configuration.
#[derive(Clone)]
pub struct AuthSettings {
    /// Shared HMAC secret
    pub jwt_secret: String,
    /// Signing algorithm name
    pub algorithm: String,
    /// Required `aud` claim
    pub audience: Option<String>,
    /// Clock skew tolerance in seconds
    pub leeway: u64,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if `POSTGREST_URL`, `POSTGREST_API_KEY` or
    ///   `JWT_SECRET_KEY` is unset or empty
    /// - [`ConfigError::Invalid`] if a numeric or boolean variable does not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                host: or_default("HOST", "0.0.0.0"),
                port: parsed(var("PORT"), "PORT", 8000)?,
                log_level: or_default("RUST_LOG", DEFAULT_LOG_FILTER),
                metrics_enabled: parsed(var("METRICS_ENABLED"), "METRICS_ENABLED", true)?,
                shutdown_timeout: parsed(var("SHUTDOWN_TIMEOUT"), "SHUTDOWN_TIMEOUT", 30)?,
            },
            store: StoreConfig {
                url: required("POSTGREST_URL")?,
                api_key: required("POSTGREST_API_KEY")?,
                service_key: var("POSTGREST_SERVICE_KEY"),
                timeout: parsed(var("POSTGREST_TIMEOUT"), "POSTGREST_TIMEOUT", 10)?,
                table: or_default("ALGORITHM_TABLE", DEFAULT_TABLE),
            },
            auth: AuthSettings {
                jwt_secret: required("JWT_SECRET_KEY")?,
                algorithm: or_default("JWT_ALGORITHM", "HS256"),
                audience: var("JWT_AUDIENCE"),
                leeway: parsed(var("JWT_LEEWAY"), "JWT_LEEWAY", 60)?,
            },
            cors_origins: var("BACKEND_CORS_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
            environment: or_default("ENVIRONMENT", "development"),
        })
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl StoreConfig {
    /// Client settings for the record store.
    #[must_use]
    pub fn to_postgrest(&self) -> PostgrestConfig {
        let config = PostgrestConfig::new(&self.url, &self.api_key)
            .with_timeout(Duration::from_secs(self.timeout));
        match &self.service_key {
            Some(key) => config.with_service_key(key),
            None => config,
        }
    }
}

impl AuthSettings {
    /// Verifier settings.
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] for a non-HMAC algorithm name.
    pub fn to_auth_config(&self) -> Result<AuthConfig, AuthError> {
        let config = AuthConfig::new(&self.jwt_secret)
            .with_algorithm_name(&self.algorithm)?
            .with_leeway(self.leeway);
        Ok(match &self.audience {
            Some(audience) => config.with_audience(audience),
            None => config,
        })
    }
}

fn parsed<T: FromStr>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|origin| origin.trim().trim_matches('"').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
