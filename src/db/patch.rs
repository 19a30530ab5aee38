use atelier_schema::{
    Category, ComponentExample, Installation, TokenMap, UsagePrompts, VariantGroups, slugify,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::AtelierError;

/// Slugs and theme values end up in URLs; keep them to one path segment.
fn validate_key(field: &str, key: &str) -> Result<(), AtelierError> {
    if key.trim().is_empty() {
        return Err(AtelierError::BadRequest(format!("{field} is required")));
    }
    if key.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#')) {
        return Err(AtelierError::BadRequest(format!(
            "{field} must not contain whitespace, '/', '?' or '#'"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AtelierError> {
    if name.trim().is_empty() {
        return Err(AtelierError::BadRequest("name is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeCreate {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub typography: Option<TokenMap>,
    #[serde(default)]
    pub spacing: Option<TokenMap>,
    #[serde(default)]
    pub effects: Option<TokenMap>,
    /// When true the new theme becomes the only active one.
    #[serde(default)]
    pub is_active: bool,
}

impl ThemeCreate {
    pub fn validate(&self) -> Result<(), AtelierError> {
        validate_name(&self.name)?;
        validate_key("value", &self.value)
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemePatch {
    pub name: Option<String>,
    pub value: Option<String>,
    pub colors: Option<BTreeMap<String, String>>,
    pub typography: Option<TokenMap>,
    pub spacing: Option<TokenMap>,
    pub effects: Option<TokenMap>,
    pub is_active: Option<bool>,
}

impl ThemePatch {
    pub fn validate(&self) -> Result<(), AtelierError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(value) = &self.value {
            validate_key("value", value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentCreate {
    pub name: String,
    /// Derived from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub props: Value,
    #[serde(default)]
    pub variants: VariantGroups,
    #[serde(default)]
    pub prompts: UsagePrompts,
    #[serde(default)]
    pub examples: Vec<ComponentExample>,
    #[serde(default)]
    pub installation: Installation,
}

impl ComponentCreate {
    pub fn slug(&self) -> String {
        self.slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(&self.name))
    }

    pub fn validate(&self) -> Result<(), AtelierError> {
        validate_name(&self.name)?;
        validate_key("slug", &self.slug())
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub code: Option<String>,
    pub props: Option<Value>,
    pub variants: Option<VariantGroups>,
    pub prompts: Option<UsagePrompts>,
    pub examples: Option<Vec<ComponentExample>>,
    pub installation: Option<Installation>,
}

impl ComponentPatch {
    pub fn validate(&self) -> Result<(), AtelierError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(slug) = &self.slug {
            validate_key("slug", slug)?;
        }
        Ok(())
    }
}

/// Filter for `GET /api/public/components`.
#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    pub category: Option<String>,
    pub limit: u32,
}

/// Filter for `GET /api/public/search`.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub query: String,
    pub category: Option<String>,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
    pub role: crate::auth::Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_slug_defaults_to_slugified_name() {
        let create = ComponentCreate {
            name: "Icon Button".into(),
            ..Default::default()
        };
        assert_eq!(create.slug(), "icon-button");
        assert!(create.validate().is_ok());
    }

    #[test]
    fn slug_with_path_separator_is_rejected() {
        let create = ComponentCreate {
            name: "Card".into(),
            slug: Some("card/item".into()),
            ..Default::default()
        };
        assert!(matches!(create.validate(), Err(AtelierError::BadRequest(_))));
    }

    #[test]
    fn derived_slug_from_punctuated_name_is_valid() {
        let create = ComponentCreate {
            name: "Input / Select?".into(),
            ..Default::default()
        };
        assert_eq!(create.slug(), "input-select");
        assert!(create.validate().is_ok());
    }

    #[test]
    fn theme_requires_name_and_value() {
        let create = ThemeCreate {
            name: "Dark".into(),
            ..Default::default()
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn unknown_category_fails_to_deserialize() {
        let res = serde_json::from_str::<ComponentCreate>(r#"{"name":"X","category":"widgets"}"#);
        assert!(res.is_err());
    }
}
