//! Error types for bearer token verification.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of token verification and issuance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// No bearer token was presented.
    #[error("Missing bearer token")]
    MissingToken,

    /// The token is malformed, has a bad signature, or fails a claim check.
    #[error("Could not validate credentials: {reason}")]
    InvalidToken {
        /// What failed
        reason: String,
    },

    /// The token's `exp` is in the past (beyond the configured leeway).
    #[error("Token has expired")]
    TokenExpired,

    /// The token verified but carries no usable `sub` claim.
    #[error("Invalid token payload")]
    MissingSubject,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The verifier was configured with an unusable secret or algorithm.
    #[error("Invalid auth configuration: {0}")]
    Configuration(String),

    /// A token could not be signed.
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Returns `true` if the caller can fix this by presenting another token.
    ///
    /// # Examples
    ///
    /// ```
    /// # use algorithm_hub_auth::AuthError;
    /// assert!(AuthError::TokenExpired.is_client_error());
    /// assert!(!AuthError::Configuration("empty secret".into()).is_client_error());
    /// ```
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingToken
                | Self::InvalidToken { .. }
                | Self::TokenExpired
                | Self::MissingSubject
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken {
                reason: err.to_string(),
            },
        }
    }
}
