//! Identity endpoints under `/api/v1/auth`.

use crate::extractors::AuthUser;
use algorithm_hub_auth::AuthenticatedUser;
use axum::Json;

/// The verified caller, straight from the bearer token.
///
/// ```text
/// GET /api/v1/auth/me
/// ```
#[allow(clippy::unused_async)]
pub async fn me(AuthUser(user): AuthUser) -> Json<AuthenticatedUser> {
    Json(user)
}
