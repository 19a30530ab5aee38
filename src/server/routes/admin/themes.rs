use crate::auth::{Action, authorize};
use crate::catalog::{self, ThemeList};
use crate::db::{ThemeCreate, ThemePatch};
use crate::error::{AtelierError, ResultExt};
use crate::server::extract::JsonBody;
use crate::server::guards::RequireSession;
use crate::server::router::AtelierState;
use crate::server::routes::auth::Success;
use atelier_schema::Theme;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

/// GET /api/admin/themes
pub async fn list_themes(
    State(state): State<AtelierState>,
    RequireSession(_session): RequireSession,
) -> Result<Json<ThemeList>, AtelierError> {
    Ok(Json(catalog::list_themes(&state.db).await?))
}

/// POST /api/admin/themes
pub async fn create_theme(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    JsonBody(create): JsonBody<ThemeCreate>,
) -> Result<(StatusCode, Json<Theme>), AtelierError> {
    authorize(Some(&session), Action::Create)?;
    create.validate()?;

    let theme = state
        .db
        .create_theme(create)
        .await
        .or_generic("Failed to create theme")?;
    info!(theme = %theme.value, active = theme.is_active, "theme created");
    Ok((StatusCode::CREATED, Json(theme.into())))
}

/// GET /api/admin/themes/{id}
pub async fn get_theme(
    State(state): State<AtelierState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<Theme>, AtelierError> {
    let theme = state
        .db
        .get_theme(id)
        .await
        .or_generic("Failed to fetch theme")?;
    Ok(Json(theme.into()))
}

/// PATCH /api/admin/themes/{id}
pub async fn update_theme(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    Path(id): Path<i64>,
    JsonBody(patch): JsonBody<ThemePatch>,
) -> Result<Json<Theme>, AtelierError> {
    authorize(Some(&session), Action::Edit)?;
    patch.validate()?;

    let theme = state
        .db
        .update_theme(id, patch)
        .await
        .or_generic("Failed to update theme")?;
    info!(theme = %theme.value, "theme updated");
    Ok(Json(theme.into()))
}

/// POST /api/admin/themes/{id}/activate
pub async fn activate_theme(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<Theme>, AtelierError> {
    authorize(Some(&session), Action::Edit)?;

    let theme = state
        .db
        .activate_theme(id)
        .await
        .or_generic("Failed to activate theme")?;
    info!(theme = %theme.value, "theme activated");
    Ok(Json(theme.into()))
}

/// DELETE /api/admin/themes/{id}
pub async fn delete_theme(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<Success>, AtelierError> {
    authorize(Some(&session), Action::Delete)?;

    state
        .db
        .delete_theme(id)
        .await
        .or_generic("Failed to delete theme")?;
    info!(theme_id = id, "theme deleted");
    Ok(Json(Success { success: true }))
}
