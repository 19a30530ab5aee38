use crate::auth::{Role, Session, verify_password_blocking};
use crate::error::{AtelierError, ResultExt};
use crate::server::extract::JsonBody;
use crate::server::guards::MaybeSession;
use crate::server::router::AtelierState;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub password: Option<String>,
    /// Absent for the shared admin password.
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

pub fn router() -> Router<AtelierState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

async fn authenticate(
    state: &AtelierState,
    email: Option<&str>,
    password: String,
) -> Result<Session, AtelierError> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        None => {
            let Some(hash) = state
                .db
                .get_admin_password_hash()
                .await
                .or_generic("An error occurred during login")?
            else {
                warn!("login attempted but no admin password is set");
                return Err(AtelierError::InvalidCredentials("Invalid password"));
            };
            if !verify_password_blocking(password, hash).await {
                return Err(AtelierError::InvalidCredentials("Invalid password"));
            }
            Ok(Session::new(None, None, Role::Admin))
        }
        Some(email) => {
            const BAD_LOGIN: &str = "Invalid email or password";
            let user = state
                .db
                .get_user_by_email(email)
                .await
                .or_generic("An error occurred during login")?
                .ok_or(AtelierError::InvalidCredentials(BAD_LOGIN))?;
            if !verify_password_blocking(password, user.password_hash.clone()).await {
                return Err(AtelierError::InvalidCredentials(BAD_LOGIN));
            }
            let role = user.role.parse::<Role>().map_err(AtelierError::Internal)?;
            Ok(Session::new(Some(user.id), Some(user.email), role))
        }
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AtelierState>,
    jar: PrivateCookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AtelierError> {
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AtelierError::BadRequest("Password is required".to_string()))?;

    let session = authenticate(&state, req.email.as_deref(), password).await?;
    info!(role = %session.role, email = session.email.as_deref().unwrap_or("-"), "login succeeded");

    let jar = jar.add(session.to_cookie(&state.session));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            role: session.role,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (
        jar.remove(Session::removal_cookie()),
        Json(Success { success: true }),
    )
}

/// GET /api/auth/session
pub async fn session(MaybeSession(session): MaybeSession) -> Json<SessionInfo> {
    Json(match session {
        Some(session) => SessionInfo {
            authenticated: true,
            role: Some(session.role),
            email: session.email,
        },
        None => SessionInfo {
            authenticated: false,
            role: None,
            email: None,
        },
    })
}
