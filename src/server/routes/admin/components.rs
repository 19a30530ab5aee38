use crate::auth::{Action, authorize};
use crate::catalog::{self, ComponentList, DEFAULT_LIST_LIMIT, parse_limit};
use crate::db::{ComponentCreate, ComponentPatch};
use crate::error::{AtelierError, ResultExt};
use crate::server::extract::JsonBody;
use crate::server::guards::RequireSession;
use crate::server::router::AtelierState;
use crate::server::routes::auth::Success;
use crate::server::routes::public::handlers::ListQuery;
use atelier_schema::Component;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;

/// GET /api/admin/components
pub async fn list_components(
    State(state): State<AtelierState>,
    RequireSession(_session): RequireSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<ComponentList>, AtelierError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_LIST_LIMIT)?;
    Ok(Json(
        catalog::list_components(&state.db, query.category, limit).await?,
    ))
}

/// POST /api/admin/components
pub async fn create_component(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    JsonBody(create): JsonBody<ComponentCreate>,
) -> Result<(StatusCode, Json<Component>), AtelierError> {
    authorize(Some(&session), Action::Create)?;
    create.validate()?;

    let component = state
        .db
        .create_component(create)
        .await
        .or_generic("Failed to create component")?;
    info!(component = %component.slug, "component created");
    Ok((StatusCode::CREATED, Json(component.into())))
}

/// GET /api/admin/components/{id}
pub async fn get_component(
    State(state): State<AtelierState>,
    RequireSession(_session): RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<Component>, AtelierError> {
    let component = state
        .db
        .get_component(id)
        .await
        .or_generic("Failed to fetch component")?;
    Ok(Json(component.into()))
}

/// PATCH /api/admin/components/{id}
pub async fn update_component(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    Path(id): Path<i64>,
    JsonBody(patch): JsonBody<ComponentPatch>,
) -> Result<Json<Component>, AtelierError> {
    authorize(Some(&session), Action::Edit)?;
    patch.validate()?;

    let component = state
        .db
        .update_component(id, patch)
        .await
        .or_generic("Failed to update component")?;
    info!(component = %component.slug, "component updated");
    Ok(Json(component.into()))
}

/// DELETE /api/admin/components/{id}
pub async fn delete_component(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<Success>, AtelierError> {
    authorize(Some(&session), Action::Delete)?;

    state
        .db
        .delete_component(id)
        .await
        .or_generic("Failed to delete component")?;
    info!(component_id = id, "component deleted");
    Ok(Json(Success { success: true }))
}
