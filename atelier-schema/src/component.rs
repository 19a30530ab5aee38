use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Variant group name -> allowed option values, e.g. `size -> [sm, lg]`.
pub type VariantGroups = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Buttons,
    Inputs,
    Layout,
    Navigation,
    Feedback,
    DataDisplay,
    Overlays,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Buttons,
        Category::Inputs,
        Category::Layout,
        Category::Navigation,
        Category::Feedback,
        Category::DataDisplay,
        Category::Overlays,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Buttons => "buttons",
            Category::Inputs => "inputs",
            Category::Layout => "layout",
            Category::Navigation => "navigation",
            Category::Feedback => "feedback",
            Category::DataDisplay => "data-display",
            Category::Overlays => "overlays",
            Category::Other => "other",
        }
    }

    /// Accepts anything; unknown or blank input maps to [`Category::Other`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim()
            .to_ascii_lowercase()
            .parse()
            .unwrap_or(Category::Other)
    }

    /// Serde adapter for untrusted payloads (vendor output).
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UseCase {
    pub scenario: String,
    pub prompt: String,
    pub output: String,
}

/// Example prompts an assistant can use to ask for this component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsagePrompts {
    pub basic: Vec<String>,
    pub advanced: Vec<String>,
    #[serde(rename = "useCases")]
    pub use_cases: Vec<UseCase>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentExample {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Installation {
    pub dependencies: Vec<String>,
    #[serde(rename = "setupSteps")]
    pub setup_steps: Vec<String>,
}

/// Versionless metadata bundle describing one UI component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: Category,
    pub code: String,
    pub props: Value,
    pub variants: VariantGroups,
    pub prompts: UsagePrompts,
    pub examples: Vec<ComponentExample>,
    pub installation: Installation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `"Icon Button"` -> `"icon-button"`, `"Input / Select?"` -> `"input-select"`.
///
/// Runs of anything other than letters and digits collapse into one `-`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercases group names and option values.
///
/// Groups that collide after lowercasing (`Size` and `size`) are merged; options keep
/// first-seen order and duplicates are dropped.
pub fn normalize_variants(variants: &VariantGroups) -> VariantGroups {
    let mut out = VariantGroups::new();
    for (group, options) in variants {
        let merged = out.entry(group.trim().to_lowercase()).or_default();
        for option in options {
            let option = option.trim().to_lowercase();
            if !option.is_empty() && !merged.contains(&option) {
                merged.push(option);
            }
        }
    }
    out
}
