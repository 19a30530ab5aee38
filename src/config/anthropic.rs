use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable consulted when `anthropic.api_key` is empty.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Vendor (Messages API) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. TOML: `anthropic.api_key`. Falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    /// TOML: `anthropic.base_url`. Default: `https://api.anthropic.com`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Model used by every generation stage.
    /// TOML: `anthropic.model`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Value of the `anthropic-version` header.
    /// TOML: `anthropic.api_version`. Default: `2023-06-01`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Optional upstream HTTP proxy, e.g. `http://127.0.0.1:1080`.
    /// TOML: `anthropic.proxy`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Whole-request timeout in seconds.
    /// TOML: `anthropic.timeout_secs`. Default: `600`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transport errors and upstream 5xx. `0` disables retrying.
    /// TOML: `anthropic.retry_max_times`. Default: `0`.
    #[serde(default)]
    pub retry_max_times: usize,
}

#[derive(Debug, Clone)]
pub struct AnthropicResolvedConfig {
    /// `None` when neither the config nor the environment provides a key.
    pub api_key: Option<String>,
    pub messages_url: Url,
    pub model: String,
    pub api_version: String,
    pub proxy: Option<Url>,
    pub timeout: Duration,
    pub retry_max_times: usize,
}

impl AnthropicConfig {
    pub fn resolve(&self) -> AnthropicResolvedConfig {
        let api_key = Some(self.api_key.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
            });

        AnthropicResolvedConfig {
            api_key,
            messages_url: messages_url(&self.base_url),
            model: self.model.clone(),
            api_version: self.api_version.clone(),
            proxy: self.proxy.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            retry_max_times: self.retry_max_times,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            api_version: default_api_version(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            retry_max_times: 0,
        }
    }
}

/// `{base}/v1/messages`, tolerating a base with or without a trailing slash or path.
fn messages_url(base: &Url) -> Url {
    let mut url = base.clone();
    let path = format!("{}/v1/messages", base.path().trim_end_matches('/'));
    url.set_path(&path);
    url
}

fn default_base_url() -> Url {
    Url::parse("https://api.anthropic.com").expect("static base url is valid")
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    10 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_joins_base_path() {
        let base = Url::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(
            messages_url(&base).as_str(),
            "http://127.0.0.1:9000/v1/messages"
        );

        let nested = Url::parse("http://proxy.local/anthropic/").unwrap();
        assert_eq!(
            messages_url(&nested).as_str(),
            "http://proxy.local/anthropic/v1/messages"
        );
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let cfg = AnthropicConfig {
            api_key: " sk-test ".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.resolve().api_key.as_deref(), Some("sk-test"));
    }
}
