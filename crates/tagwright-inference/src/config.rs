//! LLM backend selection and settings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use tagwright_core::defaults;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid LLM backend: {0} (expected openai, anthropic or ollama)")]
    InvalidBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM not configured")]
    NotConfigured,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Supported backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmBackendKind {
    OpenAI,
    Anthropic,
    Ollama,
}

impl LlmBackendKind {
    pub fn default_url(&self) -> &'static str {
        match self {
            Self::OpenAI => defaults::OPENAI_URL,
            Self::Anthropic => defaults::ANTHROPIC_URL,
            Self::Ollama => defaults::OLLAMA_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => defaults::OPENAI_MODEL,
            Self::Anthropic => defaults::ANTHROPIC_MODEL,
            Self::Ollama => defaults::OLLAMA_MODEL,
        }
    }

    /// Ollama runs locally without a token; the hosted APIs need one.
    pub fn requires_token(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl FromStr for LlmBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for LlmBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// LLM settings as supplied by the operator. Unset values fall back to the
/// backend's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub backend: Option<LlmBackendKind>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub model: Option<String>,
    /// Language the model is asked to name groups in.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: None,
            api_url: None,
            api_token: None,
            model: None,
            language: defaults::LLM_LANGUAGE.to_string(),
            timeout_secs: defaults::LLM_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// A backend is selected and has what it needs to be called: a URL for
    /// Ollama, a token for the hosted APIs.
    pub fn is_enabled(&self) -> bool {
        match self.backend {
            None => false,
            Some(LlmBackendKind::Ollama) => has_value(&self.api_url),
            Some(_) => has_value(&self.api_token),
        }
    }

    /// Base URL without a trailing slash.
    pub fn resolved_url(&self) -> Option<String> {
        let backend = self.backend?;
        let url = match &self.api_url {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ => backend.default_url(),
        };
        Some(url.trim_end_matches('/').to_string())
    }

    pub fn resolved_model(&self) -> Option<String> {
        let backend = self.backend?;
        Some(match &self.model {
            Some(model) if !model.trim().is_empty() => model.trim().to_string(),
            _ => backend.default_model().to_string(),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "LLM_API_URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "LLM timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: Option<LlmBackendKind>, url: Option<&str>, token: Option<&str>) -> LlmConfig {
        LlmConfig {
            backend,
            api_url: url.map(String::from),
            api_token: token.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("OpenAI".parse::<LlmBackendKind>().unwrap(), LlmBackendKind::OpenAI);
        assert_eq!("anthropic".parse::<LlmBackendKind>().unwrap(), LlmBackendKind::Anthropic);
        assert_eq!(" ollama ".parse::<LlmBackendKind>().unwrap(), LlmBackendKind::Ollama);
        assert_eq!(
            "gemini".parse::<LlmBackendKind>(),
            Err(ConfigError::InvalidBackend("gemini".to_string()))
        );
    }

    #[test]
    fn test_backend_display_roundtrip() {
        for kind in [LlmBackendKind::OpenAI, LlmBackendKind::Anthropic, LlmBackendKind::Ollama] {
            assert_eq!(kind.to_string().parse::<LlmBackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_enabled_rules() {
        assert!(!config(None, None, Some("tok")).is_enabled());
        assert!(config(Some(LlmBackendKind::OpenAI), None, Some("tok")).is_enabled());
        assert!(!config(Some(LlmBackendKind::OpenAI), Some("http://x"), None).is_enabled());
        assert!(!config(Some(LlmBackendKind::Anthropic), None, Some("  ")).is_enabled());
        assert!(config(Some(LlmBackendKind::Ollama), Some("http://gpu:11434"), None).is_enabled());
        assert!(!config(Some(LlmBackendKind::Ollama), None, Some("tok")).is_enabled());
    }

    #[test]
    fn test_resolved_defaults() {
        let c = config(Some(LlmBackendKind::Anthropic), None, Some("tok"));
        assert_eq!(c.resolved_url().as_deref(), Some("https://api.anthropic.com"));
        assert_eq!(c.resolved_model().as_deref(), Some("claude-3-haiku-20240307"));
    }

    #[test]
    fn test_resolved_overrides_trim_slash() {
        let mut c = config(Some(LlmBackendKind::Ollama), Some("http://gpu:11434/"), None);
        c.model = Some("qwen3:8b".to_string());
        assert_eq!(c.resolved_url().as_deref(), Some("http://gpu:11434"));
        assert_eq!(c.resolved_model().as_deref(), Some("qwen3:8b"));
    }

    #[test]
    fn test_unselected_backend_resolves_nothing() {
        assert!(LlmConfig::default().resolved_url().is_none());
        assert!(LlmConfig::default().resolved_model().is_none());
    }

    #[test]
    fn test_validate_url_scheme() {
        let c = config(Some(LlmBackendKind::Ollama), Some("gpu:11434"), None);
        assert!(matches!(c.validate(), Err(ConfigError::Validation(_))));
        assert!(LlmConfig::default().validate().is_ok());
    }
}
