//! The server-side extract -> code -> prompts -> docs chain.

use atelier_schema::anthropic::ImageSource;
use atelier_schema::{
    ComponentSpec, DocsRequest, ExtractedSpec, GeneratedDocs, PromptsRequest, ThemeContext,
    UsagePrompts, normalize_variants,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

use super::client::AnthropicClient;
use super::output::{parse_json_output, unwrap_code_block};
use super::prompts;
use crate::db::ComponentCreate;
use crate::error::AiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Code,
    Prompts,
    Docs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "extract",
            Stage::Code => "code",
            Stage::Prompts => "prompts",
            Stage::Docs => "docs",
        })
    }
}

/// Results of the stages that have completed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<ExtractedSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<UsagePrompts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<GeneratedDocs>,
}

impl PipelineOutput {
    /// Draft component assembled from whatever is available. `None` until extraction succeeded.
    pub fn to_component(&self) -> Option<ComponentCreate> {
        let spec = self.spec.as_ref()?;
        let docs = self.docs.clone().unwrap_or_default();
        let props = serde_json::to_value(&docs.api.props)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));
        Some(ComponentCreate {
            name: spec.name.clone(),
            slug: None,
            description: spec.description.clone(),
            category: spec.category,
            code: self.code.clone().unwrap_or_default(),
            props,
            variants: spec.variants.clone(),
            prompts: self.prompts.clone().unwrap_or_default(),
            examples: docs.examples,
            installation: docs.installation,
        })
    }
}

/// A stage failed; everything before it is kept in `partial`.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: AiError,
    pub partial: PipelineOutput,
}

#[derive(Serialize)]
struct StageFailureBody<'a> {
    error: String,
    stage: Stage,
    partial: &'a PipelineOutput,
}

impl IntoResponse for StageFailure {
    fn into_response(self) -> Response {
        error!(stage = %self.stage, error = %self.error, "generation pipeline failed");
        let body = StageFailureBody {
            error: self.error.to_string(),
            stage: self.stage,
            partial: &self.partial,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Clone)]
pub struct Pipeline {
    client: AnthropicClient,
}

impl Pipeline {
    pub fn new(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Stage 1. Category and variant casing are normalized on the way in.
    pub async fn extract(
        &self,
        image: ImageSource,
        theme: Option<&ThemeContext>,
    ) -> Result<ExtractedSpec, AiError> {
        let text = self.client.complete(prompts::extraction(image, theme)).await?;
        let mut spec: ExtractedSpec = parse_json_output(&text)?;
        spec.variants = normalize_variants(&spec.variants);
        Ok(spec)
    }

    pub async fn generate_code(&self, spec: &ComponentSpec) -> Result<String, AiError> {
        let text = self.client.complete(prompts::component_code(spec)).await?;
        Ok(unwrap_code_block(&text))
    }

    pub async fn generate_prompts(&self, request: &PromptsRequest) -> Result<UsagePrompts, AiError> {
        let text = self.client.complete(prompts::usage_prompts(request)).await?;
        parse_json_output(&text)
    }

    pub async fn generate_docs(&self, request: &DocsRequest) -> Result<GeneratedDocs, AiError> {
        let text = self.client.complete(prompts::documentation(request)).await?;
        parse_json_output(&text)
    }

    /// Runs all four stages in order, stopping at the first failure.
    pub async fn run(
        &self,
        image: ImageSource,
        theme: Option<ThemeContext>,
    ) -> Result<PipelineOutput, StageFailure> {
        let mut out = PipelineOutput::default();

        let spec = match self.extract(image, theme.as_ref()).await {
            Ok(spec) => spec,
            Err(error) => return Err(fail(Stage::Extract, error, out)),
        };
        info!(component = %spec.name, "pipeline: spec extracted");
        out.spec = Some(spec.clone());

        let code_spec = ComponentSpec {
            name: spec.name.clone(),
            description: spec.description.clone(),
            variants: spec.variants.clone(),
            props: Vec::new(),
            theme,
            color_mapping: Some(spec.color_mapping.clone()).filter(|m| !m.is_empty()),
        };
        let code = match self.generate_code(&code_spec).await {
            Ok(code) => code,
            Err(error) => return Err(fail(Stage::Code, error, out)),
        };
        info!(component = %spec.name, bytes = code.len(), "pipeline: code generated");
        out.code = Some(code.clone());

        let prompts_request = PromptsRequest {
            name: spec.name.clone(),
            description: spec.description.clone(),
            variants: spec.variants.clone(),
        };
        match self.generate_prompts(&prompts_request).await {
            Ok(prompts) => out.prompts = Some(prompts),
            Err(error) => return Err(fail(Stage::Prompts, error, out)),
        }
        info!(component = %spec.name, "pipeline: prompts generated");

        let docs_request = DocsRequest {
            name: spec.name.clone(),
            code,
            variants: spec.variants.clone(),
        };
        match self.generate_docs(&docs_request).await {
            Ok(docs) => out.docs = Some(docs),
            Err(error) => return Err(fail(Stage::Docs, error, out)),
        }
        info!(component = %spec.name, "pipeline: docs generated");

        Ok(out)
    }
}

fn fail(stage: Stage, error: AiError, partial: PipelineOutput) -> StageFailure {
    StageFailure {
        stage,
        error,
        partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_schema::{Category, ComponentExample, VariantGroups};

    #[test]
    fn no_component_before_extraction() {
        assert!(PipelineOutput::default().to_component().is_none());
    }

    #[test]
    fn partial_output_still_builds_a_draft() {
        let out = PipelineOutput {
            spec: Some(ExtractedSpec {
                name: "Icon Button".into(),
                category: Category::Buttons,
                variants: VariantGroups::from([("size".to_string(), vec!["sm".to_string()])]),
                ..Default::default()
            }),
            code: Some("export {}".into()),
            ..Default::default()
        };
        let draft = out.to_component().unwrap();
        assert_eq!(draft.slug(), "icon-button");
        assert_eq!(draft.category, Category::Buttons);
        assert_eq!(draft.code, "export {}");
        assert!(draft.examples.is_empty());
    }

    #[test]
    fn extracted_name_with_punctuation_yields_storable_slug() {
        let out = PipelineOutput {
            spec: Some(ExtractedSpec {
                name: "Input / Select?".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let draft = out.to_component().unwrap();
        assert_eq!(draft.slug(), "input-select");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn docs_feed_props_and_examples() {
        let mut docs = GeneratedDocs::default();
        docs.examples.push(ComponentExample {
            name: "Basic".into(),
            code: "<Badge />".into(),
        });
        let out = PipelineOutput {
            spec: Some(ExtractedSpec {
                name: "Badge".into(),
                ..Default::default()
            }),
            docs: Some(docs),
            ..Default::default()
        };
        let draft = out.to_component().unwrap();
        assert_eq!(draft.examples.len(), 1);
        assert_eq!(draft.props, serde_json::json!([]));
    }

    #[test]
    fn stage_names_are_lowercase() {
        assert_eq!(serde_json::to_value(Stage::Prompts).unwrap(), "prompts");
        assert_eq!(Stage::Docs.to_string(), "docs");
    }
}
