//! Anthropic messages backend.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use tagwright_core::{defaults, Error, Result};

use crate::backend::{check_status, http_client, request_failed, LlmBackend};

/// API version header value the request shape targets.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Base URL without the `/v1` segment.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::ANTHROPIC_URL.to_string(),
            api_key: String::new(),
            model: defaults::ANTHROPIC_MODEL.to_string(),
            timeout_seconds: defaults::LLM_TIMEOUT_SECS,
        }
    }
}

pub struct AnthropicBackend {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicBackend {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = http_client(config.timeout_seconds)?;
        info!(
            "Initializing Anthropic backend: url={}, model={}",
            config.base_url, config.model
        );
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "anthropic", op = "complete", model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status("Anthropic", response).await?;

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| {
                Error::Inference("Anthropic response contained no text block".to_string())
            })?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(response_len = content.len(), duration_ms = elapsed, "Completion received");
        if elapsed > 30000 {
            warn!(duration_ms = elapsed, slow = true, "Slow completion");
        }
        Ok(content)
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
