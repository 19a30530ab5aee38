use crate::auth::{MIN_PASSWORD_CHARS, Role, hash_password_blocking, verify_password_blocking};
use crate::db::UserCreate;
use crate::error::{AtelierError, ResultExt};
use crate::server::extract::JsonBody;
use crate::server::guards::RequireAdmin;
use crate::server::router::AtelierState;
use crate::server::routes::auth::Success;
use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/admin/change-password
///
/// Changes the shared admin password, or the signed-in admin's own account password when the
/// session belongs to a user account.
pub async fn change_password(
    State(state): State<AtelierState>,
    RequireAdmin(session): RequireAdmin,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<Success>, AtelierError> {
    if req.new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AtelierError::BadRequest(format!(
            "New password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }

    let account = match session.user_id {
        Some(id) => Some(
            state
                .db
                .get_user(id)
                .await
                .or_generic("Failed to change password")?
                .ok_or(AtelierError::Unauthenticated)?,
        ),
        None => None,
    };
    let current_hash = match &account {
        Some(user) => Some(user.password_hash.clone()),
        None => state
            .db
            .get_admin_password_hash()
            .await
            .or_generic("Failed to change password")?,
    };

    let verified = match current_hash {
        Some(hash) => verify_password_blocking(req.current_password, hash).await,
        None => false,
    };
    if !verified {
        return Err(AtelierError::InvalidCredentials(
            "Current password is incorrect",
        ));
    }

    let new_hash = hash_password_blocking(req.new_password)
        .await
        .or_generic("Failed to change password")?;
    match account {
        Some(user) => {
            state
                .db
                .upsert_user(UserCreate {
                    email: user.email.clone(),
                    password_hash: new_hash,
                    role: Role::Admin,
                })
                .await
                .or_generic("Failed to change password")?;
            info!(email = %user.email, "account password changed");
        }
        None => {
            state
                .db
                .set_admin_password_hash(new_hash)
                .await
                .or_generic("Failed to change password")?;
            info!("admin password changed");
        }
    }

    Ok(Json(Success { success: true }))
}
