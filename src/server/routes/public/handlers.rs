use crate::catalog::{
    self, ComponentList, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, SearchResults, ThemeList,
    parse_limit,
};
use crate::error::AtelierError;
use crate::server::router::AtelierState;
use atelier_schema::{Component, Theme};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    /// Kept as text so a bad value gets our 400 body.
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/public/themes
pub async fn list_themes(State(state): State<AtelierState>) -> Result<Json<ThemeList>, AtelierError> {
    Ok(Json(catalog::list_themes(&state.db).await?))
}

/// GET /api/public/themes/{value}
pub async fn theme_by_value(
    State(state): State<AtelierState>,
    Path(value): Path<String>,
) -> Result<Json<Theme>, AtelierError> {
    Ok(Json(catalog::theme_by_value(&state.db, &value).await?))
}

/// GET /api/public/active-theme
pub async fn active_theme(State(state): State<AtelierState>) -> Result<Json<Theme>, AtelierError> {
    catalog::active_theme(&state.db)
        .await?
        .map(Json)
        .ok_or(AtelierError::NotFound("No active theme"))
}

/// GET /api/public/components?category=&limit=
pub async fn list_components(
    State(state): State<AtelierState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ComponentList>, AtelierError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_LIST_LIMIT)?;
    Ok(Json(
        catalog::list_components(&state.db, query.category, limit).await?,
    ))
}

/// GET /api/public/components/{slug}
pub async fn component_by_slug(
    State(state): State<AtelierState>,
    Path(slug): Path<String>,
) -> Result<Json<Component>, AtelierError> {
    Ok(Json(catalog::component_by_slug(&state.db, &slug).await?))
}

/// GET /api/public/search?q=&category=&limit=
pub async fn search_components(
    State(state): State<AtelierState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, AtelierError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AtelierError::BadRequest(
            "Query parameter \"q\" is required".to_string(),
        ));
    }
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_SEARCH_LIMIT)?;
    Ok(Json(
        catalog::search_components(&state.db, q, query.category, limit).await?,
    ))
}
