use atelier_schema::anthropic::{Message, MessagesRequest, MessagesResponse, VendorErrorBody};
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::prompts::StageRequest;
use crate::config::AnthropicResolvedConfig;
use crate::error::{AiError, AtelierError, IsRetryable};
use crate::utils::logging::with_pretty_json_debug;

const UPSTREAM_BODY_PREVIEW_CHARS: usize = 500;

/// Messages API client shared by every generation stage.
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    cfg: Arc<AnthropicResolvedConfig>,
    retry_policy: ExponentialBuilder,
}

impl AnthropicClient {
    pub fn new(cfg: AnthropicResolvedConfig) -> Result<Self, AtelierError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .timeout(cfg.timeout);

        if let Some(proxy_url) = &cfg.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| AtelierError::Internal(format!("invalid anthropic.proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| AtelierError::Internal(format!("failed to build HTTP client: {e}")))?;

        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(8))
            .with_max_times(cfg.retry_max_times)
            .with_jitter();

        Ok(Self {
            http,
            cfg: Arc::new(cfg),
            retry_policy,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.cfg.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    pub fn build_request(
        &self,
        api_key: &str,
        body: &MessagesRequest,
    ) -> Result<reqwest::Request, reqwest::Error> {
        self.http
            .post(self.cfg.messages_url.clone())
            .header("x-api-key", api_key)
            .header("anthropic-version", self.cfg.api_version.as_str())
            .json(body)
            .build()
    }

    /// Runs one stage and returns the first text block of the reply.
    pub async fn complete(&self, stage: StageRequest) -> Result<String, AiError> {
        let api_key = self.cfg.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let body = MessagesRequest {
            model: self.cfg.model.clone(),
            max_tokens: stage.max_tokens,
            temperature: stage.temperature,
            system: stage.system.map(str::to_string),
            messages: vec![Message::user(stage.content)],
        };

        let body = &body;
        let op = || async move {
            let start = Instant::now();
            let req = self.build_request(api_key, body)?;
            let resp = self.http.execute(req).await?;
            let status = resp.status();

            if !status.is_success() {
                let bytes = resp.bytes().await.unwrap_or_default();
                let message = match serde_json::from_slice::<VendorErrorBody>(&bytes) {
                    Ok(parsed) => parsed.error.message,
                    Err(_) => {
                        let raw = String::from_utf8_lossy(&bytes);
                        format!("{:.len$}", raw, len = UPSTREAM_BODY_PREVIEW_CHARS)
                    }
                };
                return Err(AiError::Upstream { status, message });
            }

            let parsed: MessagesResponse = resp.json().await?;
            info!(
                model = %parsed.model,
                elapsed_ms = start.elapsed().as_millis() as u64,
                input_tokens = parsed.usage.as_ref().map(|u| u.input_tokens).unwrap_or(0),
                output_tokens = parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0),
                stop_reason = parsed.stop_reason.as_deref().unwrap_or("-"),
                "messages call finished"
            );
            with_pretty_json_debug(&parsed, |pretty| {
                debug!(body = %pretty, "messages response");
            });

            parsed
                .first_text()
                .map(str::to_string)
                .ok_or(AiError::EmptyResponse)
        };

        op.retry(self.retry_policy)
            .when(|err: &AiError| err.is_retryable())
            .notify(|err, dur: Duration| {
                warn!("Messages call retrying after error {} in {:?}", err, dur);
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnthropicConfig;
    use atelier_schema::anthropic::ContentBlock;
    use reqwest::Method;

    #[test]
    fn build_request_sets_vendor_headers() {
        let cfg = AnthropicConfig {
            api_key: "sk-test".into(),
            base_url: url::Url::parse("http://127.0.0.1:9").unwrap(),
            ..Default::default()
        };
        let client = AnthropicClient::new(cfg.resolve()).unwrap();
        let body = MessagesRequest {
            model: client.model().to_string(),
            max_tokens: 16,
            temperature: None,
            system: None,
            messages: vec![Message::user(vec![ContentBlock::text("hi")])],
        };

        let req = client.build_request("sk-test", &body).unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().as_str(), "http://127.0.0.1:9/v1/messages");
        assert_eq!(
            req.headers().get("x-api-key").and_then(|v| v.to_str().ok()),
            Some("sk-test")
        );
        assert_eq!(
            req.headers()
                .get("anthropic-version")
                .and_then(|v| v.to_str().ok()),
            Some("2023-06-01")
        );
    }
}
