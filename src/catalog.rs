//! Read-side queries shared by the public API and the MCP bridge.

use atelier_schema::{Component, Theme};
use serde::Serialize;

use crate::db::{ComponentFilter, DbActorHandle, SearchFilter};
use crate::error::{AtelierError, ResultExt};

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 1000;
/// Used by callers that want every row, such as the MCP list tool.
pub const NO_LIMIT: u32 = u32::MAX;

#[derive(Debug, Clone, Serialize)]
pub struct ThemeList {
    pub themes: Vec<Theme>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentList {
    pub components: Vec<Component>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub results: Vec<Component>,
    pub count: usize,
    pub query: String,
}

/// Parses a `limit` query value. Absent or blank means `default`; the result is clamped to
/// `1..=MAX_LIMIT`.
pub fn parse_limit(raw: Option<&str>, default: u32) -> Result<u32, AtelierError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u32>()
            .map(|n| n.clamp(1, MAX_LIMIT))
            .map_err(|_| {
                AtelierError::BadRequest(format!(
                    "Query parameter \"limit\" must be a positive integer, got `{raw}`"
                ))
            }),
    }
}

pub async fn list_themes(db: &DbActorHandle) -> Result<ThemeList, AtelierError> {
    let themes: Vec<Theme> = db
        .list_themes()
        .await
        .or_generic("Failed to fetch themes")?
        .into_iter()
        .map(Theme::from)
        .collect();
    Ok(ThemeList {
        count: themes.len(),
        themes,
    })
}

pub async fn theme_by_value(db: &DbActorHandle, value: &str) -> Result<Theme, AtelierError> {
    db.get_theme_by_value(value)
        .await
        .map(Theme::from)
        .or_generic("Failed to fetch theme")
}

pub async fn active_theme(db: &DbActorHandle) -> Result<Option<Theme>, AtelierError> {
    Ok(db
        .get_active_theme()
        .await
        .or_generic("Failed to fetch active theme")?
        .map(Theme::from))
}

pub async fn list_components(
    db: &DbActorHandle,
    category: Option<String>,
    limit: u32,
) -> Result<ComponentList, AtelierError> {
    let components: Vec<Component> = db
        .list_components(ComponentFilter { category, limit })
        .await
        .or_generic("Failed to fetch components")?
        .into_iter()
        .map(Component::from)
        .collect();
    Ok(ComponentList {
        count: components.len(),
        components,
    })
}

pub async fn component_by_slug(db: &DbActorHandle, slug: &str) -> Result<Component, AtelierError> {
    db.get_component_by_slug(slug)
        .await
        .map(Component::from)
        .or_generic("Failed to fetch component")
}

pub async fn search_components(
    db: &DbActorHandle,
    query: &str,
    category: Option<String>,
    limit: u32,
) -> Result<SearchResults, AtelierError> {
    let results: Vec<Component> = db
        .search_components(SearchFilter {
            query: query.to_string(),
            category,
            limit,
        })
        .await
        .or_generic("Failed to search components")?
        .into_iter()
        .map(Component::from)
        .collect();
    Ok(SearchResults {
        count: results.len(),
        results,
        query: query.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(parse_limit(None, 100).unwrap(), 100);
        assert_eq!(parse_limit(Some(" "), 50).unwrap(), 50);
        assert_eq!(parse_limit(Some("20"), 100).unwrap(), 20);
        assert_eq!(parse_limit(Some("5000"), 100).unwrap(), MAX_LIMIT);
        assert_eq!(parse_limit(Some("0"), 100).unwrap(), 1);
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        assert!(matches!(
            parse_limit(Some("ten"), 100),
            Err(AtelierError::BadRequest(_))
        ));
        assert!(parse_limit(Some("-1"), 100).is_err());
    }
}
