//! # Algorithm Hub `PostgREST` Store
//!
//! Production [`RecordStore`](algorithm_hub_core::RecordStore) speaking the
//! `PostgREST` HTTP dialect used by hosted Postgres platforms
//! (`{base_url}/rest/v1/{table}`).
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `create`  | `POST /rest/v1/{table}` with `Prefer: return=representation` |
//! | `update`  | `PATCH /rest/v1/{table}?id=eq.{id}` with `Prefer: return=representation` |
//! | `list`    | `GET /rest/v1/{table}?select=*&{column}=eq.{value}&limit={n}` |
//! | `get`     | `GET /rest/v1/{table}?select=*&id=eq.{id}&limit=1` |
//!
//! ## Example
//!
//! ```no_run
//! use algorithm_hub_postgrest::{PostgrestConfig, PostgrestRecordStore};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), algorithm_hub_core::StorageError> {
//! let config = PostgrestConfig::new("https://project.example.co", "anon-key")
//!     .with_service_key("service-role-key")
//!     .with_timeout(Duration::from_secs(5));
//! let store = PostgrestRecordStore::new(config)?;
//! # Ok(())
//! # }
//! ```

mod store;

pub use store::PostgrestRecordStore;

use std::time::Duration;

/// Connection settings for a `PostgREST` endpoint.
#[derive(Clone)]
pub struct PostgrestConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Public (anon) API key, always sent as the `apikey` header.
    pub api_key: String,
    /// Service-role key. Preferred over `api_key` for the bearer token when set.
    pub service_key: Option<String>,
    /// Per-request timeout.
    ///
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl std::fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PostgrestConfig {
    /// Create configuration for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            service_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Use `service_key` as the bearer token.
    #[must_use]
    pub fn with_service_key(mut self, service_key: impl Into<String>) -> Self {
        self.service_key = Some(service_key.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Key sent in the `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_key_preferred_for_bearer() {
        let config = PostgrestConfig::new("http://localhost", "anon");
        assert_eq!(config.bearer_key(), "anon");
        assert_eq!(config.with_service_key("service").bearer_key(), "service");
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!(
            "{:?}",
            PostgrestConfig::new("http://localhost", "anon-key").with_service_key("service-key")
        );
        assert!(!rendered.contains("anon-key"));
        assert!(!rendered.contains("service-key"));
    }
}
