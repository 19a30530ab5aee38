use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

use super::ai::AiError;

#[derive(Debug, ThisError)]
pub enum AtelierError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthenticated,

    /// Credentials were supplied but did not verify.
    #[error("{0}")]
    InvalidCredentials(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Cannot delete active theme")]
    ActiveThemeDeletion,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("{0}")]
    Internal(String),
}

impl AtelierError {
    pub fn status(&self) -> StatusCode {
        match self {
            AtelierError::BadRequest(_) | AtelierError::ActiveThemeDeletion => {
                StatusCode::BAD_REQUEST
            }
            AtelierError::Unauthenticated | AtelierError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            AtelierError::Forbidden(_) => StatusCode::FORBIDDEN,
            AtelierError::NotFound(_) => StatusCode::NOT_FOUND,
            AtelierError::Conflict(_) => StatusCode::CONFLICT,
            AtelierError::Ai(_)
            | AtelierError::DatabaseError(_)
            | AtelierError::RactorError(_)
            | AtelierError::PasswordHash(_)
            | AtelierError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Storage and plumbing failures whose detail must not reach clients.
    fn is_opaque(&self) -> bool {
        matches!(
            self,
            AtelierError::DatabaseError(_)
                | AtelierError::RactorError(_)
                | AtelierError::PasswordHash(_)
        )
    }
}

/// Standard error payload: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AtelierError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.is_opaque() {
            tracing::error!(error = %self, "internal failure");
            "An internal server error occurred.".to_string()
        } else {
            if status.is_server_error() {
                tracing::error!(status = %status, error = %self, "request failed");
            } else {
                tracing::debug!(status = %status, error = %self, "request rejected");
            }
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub trait ResultExt<T> {
    /// Replaces storage/plumbing failures with `Internal(message)` after logging the detail.
    /// Client-facing errors (404, 400, ...) pass through untouched.
    fn or_generic(self, message: &'static str) -> Result<T, AtelierError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AtelierError>,
{
    fn or_generic(self, message: &'static str) -> Result<T, AtelierError> {
        self.map_err(|e| {
            let e = e.into();
            if e.is_opaque() {
                tracing::error!(error = %e, "{message}");
                AtelierError::Internal(message.to_string())
            } else {
                e
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_generic_messages() {
        let res: Result<(), AtelierError> =
            Err(AtelierError::RactorError("mailbox closed".into()));
        let err = res.or_generic("Failed to fetch themes").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch themes");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_pass_through() {
        let res: Result<(), AtelierError> = Err(AtelierError::NotFound("Theme not found"));
        let err = res.or_generic("Failed to fetch theme").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Theme not found");
    }
}
