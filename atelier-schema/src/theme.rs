use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Free-form token table (typography, spacing, effects).
pub type TokenMap = Map<String, Value>;

/// A named set of design tokens. At most one theme is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    /// Unique slug, e.g. `light` or `dark`.
    pub value: String,
    /// Colour token name -> CSS colour (`#hex`, `rgb(...)`).
    pub colors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TokenMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<TokenMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TokenMap>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
