//! Error types for web handlers.
//!
//! [`AppError`] is the single rejection type of the HTTP boundary. Domain
//! errors convert into it with `?`, choosing the status code here so
//! handlers never match on error variants themselves.

use algorithm_hub_auth::AuthError;
use algorithm_hub_core::{StorageError, ValidationError};
use algorithm_hub_runtime::ServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Carries the HTTP status, a client-facing message and a stable error
/// code. The optional source is logged for 5xx responses and never sent
/// to the client.
///
/// # Examples
///
/// ```
/// use algorithm_hub_web::AppError;
/// use axum::http::StatusCode;
///
/// let err = AppError::not_found("Algorithm request", "42");
/// assert_eq!(err.status(), StatusCode::NOT_FOUND);
/// assert_eq!(err.to_string(), "[NOT_FOUND] Algorithm request with id 42 not found");
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    code: &'static str,
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach the underlying error for server-side logging.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), "BAD_REQUEST")
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHORIZED")
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND",
        )
    }

    /// 422 Unprocessable Entity.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR",
        )
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// 503 Service Unavailable.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE",
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code sent to the client.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    code: &'a str,
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        } else {
            tracing::debug!(status = %self.status, code = self.code, message = %self.message, "Request rejected");
        }

        let body = ErrorResponse {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            Self::unauthorized(err.to_string())
        } else {
            Self::internal("Authentication is misconfigured").with_source(err)
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(source) => Self::validation(source.to_string()),
            ServiceError::Execution { .. } => Self::bad_request(err.to_string()),
            ServiceError::Storage(StorageError::NotFound { id, .. }) => {
                Self::not_found("Algorithm request", id)
            }
            ServiceError::Storage(source) => {
                Self::unavailable("Record store unavailable").with_source(source)
            }
            ServiceError::Aborted { .. } => {
                Self::internal("An internal error occurred").with_source(err)
            }
            ServiceError::Lifecycle(source) => {
                Self::internal("An internal error occurred").with_source(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm_hub_core::{AlgorithmError, AlgorithmKind, LifecycleError, RequestId};

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation_error_is_422() {
        let err = AppError::from(ValidationError {
            field: "n".to_string(),
            message: "must be between 0 and 100".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "n: must be between 0 and 100");
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Configuration("empty".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let unknown = ServiceError::InvalidInput(AlgorithmError::invalid_input(
            "Unknown algorithm type: bogus",
        ));
        assert_eq!(AppError::from(unknown).status(), StatusCode::UNPROCESSABLE_ENTITY);

        let execution = AppError::from(ServiceError::Execution {
            request_id: RequestId::new(),
            kind: AlgorithmKind::PrimeCheck,
            source: AlgorithmError::invalid_input("number is required"),
        });
        assert_eq!(execution.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            execution.message(),
            "Algorithm processing failed: number is required"
        );

        let missing = ServiceError::Storage(StorageError::NotFound {
            table: "algorithm_requests".into(),
            id: "r1".into(),
        });
        assert_eq!(AppError::from(missing).status(), StatusCode::NOT_FOUND);

        let down = ServiceError::Storage(StorageError::Unavailable("down".into()));
        let down = AppError::from(down);
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(std::error::Error::source(&down).is_some());

        let aborted = AppError::from(ServiceError::Aborted {
            request_id: RequestId::new(),
            kind: AlgorithmKind::PrimeCheck,
            reason: "task 7 was cancelled".into(),
        });
        assert_eq!(aborted.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(aborted.message(), "An internal error occurred");

        let corrupt = ServiceError::Lifecycle(LifecycleError::MalformedRecord("bad".into()));
        assert_eq!(
            AppError::from(corrupt).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
