//! Authentication configuration.
//!
//! Values are supplied by the application (typically from the environment),
//! never hardcoded.

use crate::error::{AuthError, Result};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::str::FromStr;

/// Bearer token verification configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret tokens are signed with.
    pub jwt_secret: String,

    /// Signing algorithm. Only the HMAC family is accepted.
    ///
    /// Default: HS256
    pub algorithm: Algorithm,

    /// Required `aud` claim. When `None`, audience is not checked.
    pub audience: Option<String>,

    /// Clock skew tolerated when checking `exp`, in seconds.
    ///
    /// Default: 60
    pub leeway_seconds: u64,

    /// Lifetime of tokens produced by [`TokenVerifier::issue_for`](crate::TokenVerifier::issue_for).
    ///
    /// Default: 30 minutes
    pub access_token_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

impl AuthConfig {
    /// Create configuration for `jwt_secret` with HS256 and default leeway.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            audience: None,
            leeway_seconds: 60,
            access_token_ttl: Duration::minutes(30),
        }
    }

    /// Set the signing algorithm by name (`HS256`, `HS384`, `HS512`).
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] for unknown or non-HMAC algorithms.
    pub fn with_algorithm_name(mut self, name: &str) -> Result<Self> {
        let algorithm = Algorithm::from_str(name)
            .map_err(|_| AuthError::Configuration(format!("unknown JWT algorithm {name}")))?;
        self.algorithm = algorithm;
        self.validate()?;
        Ok(self)
    }

    /// Require this `aud` claim.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set clock skew leeway in seconds.
    #[must_use]
    pub const fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Set lifetime of issued tokens.
    #[must_use]
    pub const fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Check the secret is non-empty and the algorithm is HMAC.
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::Configuration("JWT secret must not be empty".into()));
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Configuration(format!(
                "{:?} requires a key pair; only HMAC algorithms are supported",
                self.algorithm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("secret");
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.leeway_seconds, 60);
        assert_eq!(config.access_token_ttl, Duration::minutes(30));
        assert!(config.audience.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_algorithm_names() {
        let config = AuthConfig::new("secret").with_algorithm_name("HS512").unwrap();
        assert_eq!(config.algorithm, Algorithm::HS512);

        assert!(AuthConfig::new("secret").with_algorithm_name("RS256").is_err());
        assert!(AuthConfig::new("secret").with_algorithm_name("nope").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            AuthConfig::new("").validate(),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", AuthConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
