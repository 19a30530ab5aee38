use axum::response::{IntoResponse, Response};
use thiserror::Error as ThisError;

use super::atelier::AtelierError;
use crate::auth::{Action, Denied};

/// Rejection produced by the session extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    /// Signed in, but only admins may perform the action.
    #[error("Admin role required")]
    Forbidden(Action),

    /// Signed in, but the route is admin-only whatever the action.
    #[error("Admin role required")]
    AdminRequired,
}

impl From<Denied> for AuthError {
    fn from(denied: Denied) -> Self {
        match denied {
            Denied::Unauthenticated => AuthError::Unauthenticated,
            Denied::Forbidden(action) => AuthError::Forbidden(action),
        }
    }
}

impl From<AuthError> for AtelierError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => AtelierError::Unauthenticated,
            AuthError::Forbidden(_) | AuthError::AdminRequired => {
                AtelierError::Forbidden(err.to_string())
            }
        }
    }
}

impl From<Denied> for AtelierError {
    fn from(denied: Denied) -> Self {
        AuthError::from(denied).into()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AtelierError::from(self).into_response()
    }
}
