//! Prompt construction for the four generation stages.

use atelier_schema::anthropic::{ContentBlock, ImageSource};
use atelier_schema::{ComponentSpec, DocsRequest, PromptsRequest, ThemeContext};
use serde::Serialize;
use std::fmt::Write as _;

/// One Messages API call, minus the model name.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRequest {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub system: Option<&'static str>,
    pub content: Vec<ContentBlock>,
}

const CODE_SYSTEM: &str = "You are an expert React developer. Generate clean, type-safe component code following the exact pattern provided.";
const PROMPTS_SYSTEM: &str =
    "You are a helpful assistant that generates AI usage prompts. Return valid JSON only.";
const DOCS_SYSTEM: &str =
    "You are a technical writer that generates component documentation. Return valid JSON only.";

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

const CASING_RULES: &str = "\
- Variant group names MUST be lowercase: variant, size, icon, state (not Type, Size)
- Variant values MUST be lowercase: default, primary, secondary, sm, lg (not Primary, Small)";

pub fn extraction(image: ImageSource, theme: Option<&ThemeContext>) -> StageRequest {
    let mut text = String::from(
        r#"Analyze this component specification image and extract the following information as shadcn/ui style JSON:

{
  "name": "Component name (e.g. Button, Card, Badge)",
  "description": "What the component does",
  "category": "one of: buttons, inputs, layout, navigation, feedback, data-display, overlays, other",
  "variants": {
    "variant": ["default", "secondary", "outline", "ghost"],
    "size": ["default", "sm", "lg"]
  },
  "colorMapping": { "specColorName": "themeToken" },
  "notes": "Any additional requirements visible in the spec"
}
"#,
    );

    if let Some(theme) = theme {
        let tokens = theme
            .colors
            .iter()
            .map(|(token, value)| format!("{token}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            text,
            "\nTHEME CONTEXT ({}):\nAvailable color tokens: {tokens}\n",
            theme.name
        );
        if let Some(typography) = &theme.typography {
            let _ = writeln!(text, "Typography: {}", pretty(typography));
        }
        if let Some(spacing) = &theme.spacing {
            let _ = writeln!(text, "Spacing: {}", pretty(spacing));
        }
        text.push_str(
            "\nMap every colour you see in the spec to the closest theme token and return it in \
             \"colorMapping\", e.g. { \"Primary Button\": \"primary\", \"Text Color\": \"foreground\" }.\n",
        );
    }

    text.push_str("\nRules:\n- Extract all visible variants and their options\n");
    text.push_str(CASING_RULES);
    text.push_str(
        "\n- Sizes become a \"size\" variant, interaction states (hover, disabled, ...) a \"state\" variant\n\
         - If the category is unclear, use \"other\"\n\
         \nReturn ONLY valid JSON, no explanations or markdown.",
    );

    StageRequest {
        max_tokens: 4096,
        temperature: None,
        system: None,
        content: vec![ContentBlock::Image { source: image }, ContentBlock::text(text)],
    }
}

pub fn component_code(spec: &ComponentSpec) -> StageRequest {
    let lower = spec.name.to_lowercase();
    let mut text = format!(
        "Generate a React component following the shadcn/ui pattern exactly.\n\n\
         Name: {}\nDescription: {}\nVariants: {}\nProps: {}\n",
        spec.name,
        spec.description,
        pretty(&spec.variants),
        pretty(&spec.props),
    );

    if let Some(theme) = &spec.theme {
        let tokens = theme.colors.keys().cloned().collect::<Vec<_>>().join(", ");
        let _ = write!(
            text,
            "\nTHEME: {}\nAvailable color tokens: {tokens}\n",
            theme.name
        );
        if let Some(mapping) = &spec.color_mapping {
            let _ = writeln!(text, "Color Mapping: {}", pretty(mapping));
        }
        text.push_str(
            "\nColour rules:\n\
             - Never use hardcoded colours (no #hex, no rgb())\n\
             - Use Tailwind classes with theme tokens: bg-primary, text-foreground, border-border\n\
             - Hover: hover:bg-primary-hover; active: active:bg-primary-active; disabled: disabled:opacity-50\n\
             - Follow the colour mapping above\n",
        );
    }

    text.push_str("\nRequirements:\n");
    text.push_str(CASING_RULES);
    let _ = write!(
        text,
        "\n- Use Slot from @radix-ui/react-slot and support an asChild prop\n\
         - Build class names with cva from class-variance-authority and cn from @/lib/utils\n\
         - Export {name} and {lower}Variants, and set {name}.displayName = \"{name}\"\n\
         \nReturn ONLY the component code. No explanations.",
        name = spec.name,
    );

    StageRequest {
        max_tokens: 8192,
        temperature: Some(0.7),
        system: Some(CODE_SYSTEM),
        content: vec![ContentBlock::text(text)],
    }
}

pub fn usage_prompts(request: &PromptsRequest) -> StageRequest {
    let text = format!(
        r#"Generate AI usage prompts for this component:

Component: {name}
Description: {description}
Variants: {variants}

Create prompts in three categories:
1. Basic prompts (5-10 simple, single-variant requests such as "Give me a {name}")
2. Advanced prompts (5-10 requests combining several variants)
3. Use cases (3-5 real-world scenarios, each with a prompt and the expected JSX output)

Return as JSON:
{{
  "basic": ["..."],
  "advanced": ["..."],
  "useCases": [{{ "scenario": "...", "prompt": "...", "output": "..." }}]
}}"#,
        name = request.name,
        description = request.description,
        variants = pretty(&request.variants),
    );

    StageRequest {
        max_tokens: 8192,
        temperature: Some(0.7),
        system: Some(PROMPTS_SYSTEM),
        content: vec![ContentBlock::text(text)],
    }
}

pub fn documentation(request: &DocsRequest) -> StageRequest {
    let text = format!(
        r#"Generate documentation for this component:

Component Name: {name}
Variants: {variants}

Code:
{code}

Generate API documentation (props extracted from the code), installation steps and usage examples (basic and per variant).

Return as JSON:
{{
  "api": {{ "props": [{{ "name": "...", "type": "...", "required": false, "description": "...", "default": "..." }}] }},
  "installation": {{ "dependencies": ["class-variance-authority", "clsx", "tailwind-merge"], "setupSteps": ["..."] }},
  "examples": [{{ "name": "...", "code": "..." }}]
}}"#,
        name = request.name,
        variants = pretty(&request.variants),
        code = request.code,
    );

    StageRequest {
        max_tokens: 8192,
        temperature: Some(0.5),
        system: Some(DOCS_SYSTEM),
        content: vec![ContentBlock::text(text)],
    }
}
