//! Payloads exchanged by the AI generation stages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::component::{Category, ComponentExample, Installation, VariantGroups};
use crate::theme::TokenMap;

/// Theme descriptor passed alongside a spec sheet. A full [`crate::Theme`] row also
/// deserializes into this; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeContext {
    pub name: String,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TokenMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<TokenMap>,
}

/// Stage 1 output: what the vision model read off the spec sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedSpec {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "Category::deserialize_lenient")]
    pub category: Category,
    pub variants: VariantGroups,
    /// Spec colour label -> theme token name.
    #[serde(rename = "colorMapping")]
    pub color_mapping: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
}

/// Stage 2 input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variants: VariantGroups,
    #[serde(default)]
    pub props: Vec<PropSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeContext>,
    #[serde(
        rename = "colorMapping",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color_mapping: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
}

/// Stage 3 input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PromptsRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variants: VariantGroups,
}

/// Stage 4 input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocsRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub variants: VariantGroups,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDocs {
    pub props: Vec<PropDoc>,
}

/// Stage 4 output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedDocs {
    pub api: ApiDocs,
    pub installation: Installation,
    pub examples: Vec<ComponentExample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_spec_tolerates_sparse_vendor_output() {
        let spec: ExtractedSpec = serde_json::from_str(
            r#"{"name":"Badge","category":"Widgets","variants":{"variant":["default"]}}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "Badge");
        assert_eq!(spec.category, Category::Other);
        assert!(spec.color_mapping.is_empty());
        assert!(spec.description.is_empty());
    }

    #[test]
    fn theme_row_deserializes_as_context() {
        let ctx: ThemeContext = serde_json::from_str(
            r##"{"id":3,"name":"Dark","value":"dark","colors":{"primary":"#111"},"is_active":true}"##,
        )
        .unwrap();
        assert_eq!(ctx.name, "Dark");
        assert_eq!(ctx.colors["primary"], "#111");
    }
}
