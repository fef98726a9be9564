//! Group suggestions over a configured backend.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, instrument};

use tagwright_core::{Error, GroupSuggester, Result};

use crate::anthropic::{AnthropicBackend, AnthropicConfig};
use crate::backend::LlmBackend;
use crate::config::{ConfigError, LlmBackendKind, LlmConfig};
use crate::ollama::{OllamaBackend, OllamaConfig};
use crate::openai::{OpenAIBackend, OpenAIConfig};
use crate::parse::parse_groups;
use crate::prompt::build_prompt;

/// Suggests semantic groups by prompting one backend.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
    language: String,
}

impl LlmClient {
    pub fn new(backend: Box<dyn LlmBackend>, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }

    /// Build the client for the configured backend.
    ///
    /// Fails with [`Error::Config`] when no backend is enabled.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let (Some(kind), Some(url), Some(model)) = (
            config.backend.filter(|_| config.is_enabled()),
            config.resolved_url(),
            config.resolved_model(),
        ) else {
            return Err(Error::Config(ConfigError::NotConfigured.to_string()));
        };

        let token = config.api_token.clone().unwrap_or_default();
        let backend: Box<dyn LlmBackend> = match kind {
            LlmBackendKind::OpenAI => Box::new(OpenAIBackend::new(OpenAIConfig {
                base_url: url,
                api_key: Some(token),
                model,
                timeout_seconds: config.timeout_secs,
            })?),
            LlmBackendKind::Anthropic => Box::new(AnthropicBackend::new(AnthropicConfig {
                base_url: url,
                api_key: token,
                model,
                timeout_seconds: config.timeout_secs,
            })?),
            LlmBackendKind::Ollama => Box::new(OllamaBackend::new(OllamaConfig {
                base_url: url,
                model,
                timeout_seconds: config.timeout_secs,
            })?),
        };

        Ok(Self::new(backend, config.language.clone()))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }
}

#[async_trait]
impl GroupSuggester for LlmClient {
    #[instrument(skip(self, names), fields(subsystem = "inference", component = "client", op = "suggest_groups", backend = self.backend.name(), input_count = names.len()))]
    async fn suggest_groups(
        &self,
        names: &[String],
        item_type: &str,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        if names.is_empty() {
            return Ok(BTreeMap::new());
        }
        let start = Instant::now();

        let prompt = build_prompt(names, item_type, &self.language);
        let content = self.backend.complete(&prompt).await?;
        let groups = parse_groups(&content);

        info!(
            result_count = groups.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "LLM group suggestions received"
        );
        Ok(groups)
    }

    fn backend_name(&self) -> &str {
        self.backend.name()
    }
}
