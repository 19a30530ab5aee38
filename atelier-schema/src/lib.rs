pub mod anthropic;
pub mod component;
pub mod generation;
pub mod theme;

pub use component::{
    Category, Component, ComponentExample, Installation, UnknownCategory, UsagePrompts, UseCase,
    VariantGroups, normalize_variants, slugify,
};
pub use generation::{
    ApiDocs, ComponentSpec, DocsRequest, ExtractedSpec, GeneratedCode, GeneratedDocs, PromptsRequest,
    PropDoc, PropSpec, ThemeContext,
};
pub use theme::{Theme, TokenMap};
