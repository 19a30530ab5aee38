use crate::auth::{Role, Session};
use crate::error::AuthError;
use crate::server::router::AtelierState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::PrivateCookieJar;
use std::convert::Infallible;

fn session_from_parts(parts: &Parts, state: &AtelierState) -> Option<Session> {
    let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
    Session::from_jar(&jar, &state.session)
}

/// Current session, if the request carries a valid one.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AtelierState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AtelierState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_parts(parts, state)))
    }
}

/// Any signed-in user; 401 otherwise.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl FromRequestParts<AtelierState> for RequireSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AtelierState,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(RequireSession)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Signed-in admin; 401 without a session, 403 for editors.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Session);

impl FromRequestParts<AtelierState> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AtelierState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).ok_or(AuthError::Unauthenticated)?;
        if session.role != Role::Admin {
            return Err(AuthError::AdminRequired);
        }
        Ok(RequireAdmin(session))
    }
}
