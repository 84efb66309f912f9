//! # Algorithm Hub Authentication
//!
//! Bearer token verification for the Algorithm Hub service.
//!
//! Users sign in with an external identity provider, which issues
//! HMAC-signed JWT access tokens. This crate only verifies them:
//!
//! ```text
//! Authorization: Bearer <jwt> → TokenVerifier::verify → AuthenticatedUser
//! ```
//!
//! ## Example
//!
//! ```
//! use algorithm_hub_auth::{AuthConfig, Claims, TokenVerifier};
//! use chrono::{Duration, Utc};
//!
//! let verifier = TokenVerifier::new(AuthConfig::new("dev-secret")).unwrap();
//! let token = verifier
//!     .issue(&Claims::for_user("user-1", Utc::now(), Duration::minutes(30)))
//!     .unwrap();
//!
//! let user = verifier.verify(&token).unwrap();
//! assert_eq!(user.id, "user-1");
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod verifier;

// Re-export main types for convenience
pub use claims::{AuthenticatedUser, Claims};
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use verifier::TokenVerifier;
