use atelier_schema::{
    Category, Component, ComponentExample, Installation, Theme, TokenMap, UsagePrompts,
    VariantGroups,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbTheme {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub colors: Json<BTreeMap<String, String>>,
    pub typography: Option<Json<TokenMap>>,
    pub spacing: Option<Json<TokenMap>>,
    pub effects: Option<Json<TokenMap>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTheme> for Theme {
    fn from(row: DbTheme) -> Self {
        Theme {
            id: row.id,
            name: row.name,
            value: row.value,
            colors: row.colors.0,
            typography: row.typography.map(|j| j.0),
            spacing: row.spacing.map(|j| j.0),
            effects: row.effects.map(|j| j.0),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbComponent {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Validated on write; read back leniently.
    pub category: String,
    pub code: String,
    pub props: Json<Value>,
    pub variants: Json<VariantGroups>,
    pub prompts: Json<UsagePrompts>,
    pub examples: Json<Vec<ComponentExample>>,
    pub installation: Json<Installation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbComponent> for Component {
    fn from(row: DbComponent) -> Self {
        Component {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            category: Category::parse_lenient(&row.category),
            code: row.code,
            props: row.props.0,
            variants: row.variants.0,
            prompts: row.prompts.0,
            examples: row.examples.0,
            installation: row.installation.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Counts shown on the admin landing page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub themes: i64,
    pub components: i64,
    /// `value` of the active theme, if any.
    pub active_theme: Option<String>,
    pub by_category: BTreeMap<String, i64>,
}
