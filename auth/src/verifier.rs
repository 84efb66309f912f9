//! Token verification and issuance against a shared secret.

use crate::claims::{AuthenticatedUser, Claims};
use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Verifies bearer tokens issued by the identity provider.
///
/// Construct once at startup and share (it is cheap to clone behind an `Arc`).
#[derive(Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Build a verifier from `config`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the secret is empty or the algorithm
    /// is not HMAC.
    pub fn new(config: AuthConfig) -> Result<Self> {
        config.validate()?;

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = config.leeway_seconds;
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            config,
        })
    }

    /// Configuration this verifier was built from.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify `token` and extract the caller.
    ///
    /// Checks the signature, `exp` (with leeway) and, when configured, `aud`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExpired`] for an expired token
    /// - [`AuthError::InvalidToken`] for any other decoding or validation failure
    /// - [`AuthError::MissingSubject`] if `sub` is absent or empty
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthError::from(e)
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }
        Ok(data.claims.into())
    }

    /// Sign `claims` with the configured secret and algorithm.
    ///
    /// # Errors
    ///
    /// [`AuthError::Signing`] if encoding fails.
    pub fn issue(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(self.config.algorithm), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Issue a token for `sub` that expires `access_token_ttl` after `now`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Signing`] if encoding fails.
    pub fn issue_for(&self, sub: impl Into<String>, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims::for_user(sub, now, self.config.access_token_ttl);
        match &self.config.audience {
            Some(audience) => self.issue(&claims.with_audience(audience.clone())),
            None => self.issue(&claims),
        }
    }
}
