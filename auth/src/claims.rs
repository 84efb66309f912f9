//! JWT claims and the authenticated caller derived from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims carried by identity-provider access tokens.
///
/// Only `exp` is required for decoding. A missing `sub` decodes as an empty
/// string and is rejected by the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's user ID
    #[serde(default)]
    pub sub: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Intended audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Caller's email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Provider role, e.g. `authenticated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// When the email address was confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<String>,
    /// User-editable metadata
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    /// Provider-managed metadata (roles, providers)
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
}

impl Claims {
    /// Claims for `sub` issued at `now` and expiring after `ttl`.
    #[must_use]
    pub fn for_user(sub: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: sub.into(),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
            aud: None,
            email: None,
            role: None,
            email_confirmed_at: None,
            user_metadata: Map::new(),
            app_metadata: Map::new(),
        }
    }

    /// Set the email claim.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the audience claim.
    #[must_use]
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(aud.into());
        self
    }

    /// Set a key in `app_metadata`.
    #[must_use]
    pub fn with_app_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.app_metadata.insert(key.into(), value.into());
        self
    }
}

/// The verified caller of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID (the token's `sub`)
    pub id: String,
    /// Email address, if the provider included one
    pub email: Option<String>,
    /// Provider role
    pub role: Option<String>,
    /// When the email address was confirmed
    pub email_confirmed_at: Option<String>,
    /// User-editable metadata
    pub user_metadata: Map<String, Value>,
    /// Provider-managed metadata
    pub app_metadata: Map<String, Value>,
}

impl AuthenticatedUser {
    /// Whether `app_metadata.role` is `"admin"`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.app_metadata.get("role").and_then(Value::as_str) == Some("admin")
    }

    /// Whether the provider reports a confirmed email address.
    #[must_use]
    pub const fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            email_confirmed_at: claims.email_confirmed_at,
            user_metadata: claims.user_metadata,
            app_metadata: claims.app_metadata,
        }
    }
}
