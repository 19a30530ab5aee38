//! Turning model text into typed values.

use serde::de::DeserializeOwned;

use crate::error::AiError;

const PREVIEW_CHARS: usize = 200;

/// Removes every "```json" and "```" marker, each with one trailing newline, then trims.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        rest = rest.strip_prefix("json").unwrap_or(rest);
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Unwraps a single outer fenced block (any language tag); other text is returned trimmed.
pub fn unwrap_code_block(text: &str) -> String {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(body) = body.strip_suffix("```") else {
        return trimmed.to_string();
    };
    // Drop the language tag line.
    match body.split_once('\n') {
        Some((_tag, code)) => code.trim().to_string(),
        None => body.trim().to_string(),
    }
}

pub fn parse_json_output<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|source| AiError::InvalidOutput {
        source,
        preview: cleaned.chars().take(PREVIEW_CHARS).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn strips_json_fences() {
        let text = "```json\n{\"a\": 1}\n```\n";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn bare_fences_are_removed_too() {
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn unwrap_code_block_drops_language_tag() {
        let text = "```tsx\nexport const A = 1\n```";
        assert_eq!(unwrap_code_block(text), "export const A = 1");
        assert_eq!(unwrap_code_block("const B = 2"), "const B = 2");
    }

    #[test]
    fn invalid_output_keeps_a_preview() {
        let err = parse_json_output::<Value>("Sure! Here is the JSON you asked for").unwrap_err();
        match err {
            AiError::InvalidOutput { preview, .. } => {
                assert!(preview.starts_with("Sure!"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
