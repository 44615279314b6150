//! Error types for web handlers.
//!
//! Bridges the gateway's domain errors to HTTP responses via Axum's
//! `IntoResponse`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use multimusic_auth::AuthError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Data>, AppError> {
///     let profile = gateway.profile(&user_id).await?;
///     Ok(Json(profile))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach a source error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
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

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            // Auth failures: prompt a new login
            AuthError::ProviderExchangeFailed { .. }
            | AuthError::UserInfoFailed { .. }
            | AuthError::EmailNotVerified => Self::new(
                StatusCode::UNAUTHORIZED,
                message,
                "AUTH_FAILED".to_string(),
            ),
            AuthError::SessionExpired | AuthError::InvalidSession => {
                Self::unauthorized("Authentication required")
            }

            // Dead tokens: prompt re-connection of the platform
            AuthError::TokenRefreshFailed { .. } | AuthError::DecryptionFailed => Self::new(
                StatusCode::BAD_REQUEST,
                format!("{message} - please reconnect the platform"),
                "TOKEN_REFRESH_FAILED".to_string(),
            ),

            AuthError::PlatformNotConnected { .. } | AuthError::AccountNotFound => {
                Self::not_found(message)
            }

            AuthError::UnknownProvider(_)
            | AuthError::UnknownPlatform(_)
            | AuthError::InvalidStateParam => Self::bad_request(message),

            err @ (AuthError::StorageError(_)
            | AuthError::SerializationError(_)
            | AuthError::InternalError(_)) => {
                Self::internal("An internal error occurred").with_source(err.into())
            }
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_session_errors_map_to_401() {
        assert_eq!(
            AppError::from(AuthError::InvalidSession).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::SessionExpired).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_refresh_errors_map_to_400() {
        let err = AppError::from(AuthError::TokenRefreshFailed {
            platform: "spotify".to_string(),
            reason: "revoked".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        // Decryption failures are treated as refresh errors at this surface.
        assert_eq!(
            AppError::from(AuthError::DecryptionFailed).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_connection_maps_to_404() {
        let err = AppError::from(AuthError::PlatformNotConnected {
            platform: "spotify".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_detail_is_not_exposed() {
        let err = AppError::from(AuthError::StorageError("redis://secret-host".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("secret-host"));
    }
}
