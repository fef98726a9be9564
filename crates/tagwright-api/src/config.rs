//! Process configuration, read once at startup from the environment (and a
//! `.env` file loaded by `main`).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PAPERLESS_URL` | required |
//! | `PAPERLESS_API_TOKEN` | required |
//! | `HOST` / `PORT` | `0.0.0.0` / `8000` |
//! | `LOG_LEVEL` | `info` |
//! | `EXCLUDE_PATTERNS` | `new,inbox,todo,review` |
//! | `REMOTE_TIMEOUT_SECS` | `120` |
//! | `ALLOWED_ORIGINS` | `http://localhost:8000` |
//! | `LLM_TYPE` | unset (`openai`, `anthropic`, `ollama`) |
//! | `LLM_API_URL`, `LLM_API_TOKEN`, `LLM_MODEL` | per backend |
//! | `LLM_LANGUAGE` | `English` |
//! | `LLM_TIMEOUT_SECS` | `60` |

use std::time::Duration;

use thiserror::Error;

use tagwright_core::defaults;
use tagwright_inference::{ConfigError, LlmBackendKind, LlmConfig};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Llm(#[from] ConfigError),
}

/// Immutable application settings shared by every request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paperless_url: String,
    pub paperless_api_token: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub exclude_patterns: String,
    pub remote_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub llm: LlmConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let paperless_url = get("PAPERLESS_URL").ok_or(SettingsError::Missing("PAPERLESS_URL"))?;
        let paperless_api_token =
            get("PAPERLESS_API_TOKEN").ok_or(SettingsError::Missing("PAPERLESS_API_TOKEN"))?;

        let port = parse_or("PORT", get("PORT"), defaults::PORT)?;
        let remote_timeout_secs = parse_or(
            "REMOTE_TIMEOUT_SECS",
            get("REMOTE_TIMEOUT_SECS"),
            defaults::REMOTE_TIMEOUT_SECS,
        )?;

        let backend = get("LLM_TYPE")
            .map(|v| v.parse::<LlmBackendKind>())
            .transpose()?;
        let llm = LlmConfig {
            backend,
            api_url: get("LLM_API_URL"),
            api_token: get("LLM_API_TOKEN"),
            model: get("LLM_MODEL"),
            language: get("LLM_LANGUAGE").unwrap_or_else(|| defaults::LLM_LANGUAGE.to_string()),
            timeout_secs: parse_or(
                "LLM_TIMEOUT_SECS",
                get("LLM_TIMEOUT_SECS"),
                defaults::LLM_TIMEOUT_SECS,
            )?,
        };
        llm.validate()?;

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            paperless_url: paperless_url.trim().trim_end_matches('/').to_string(),
            paperless_api_token: paperless_api_token.trim().to_string(),
            host: get("HOST").unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            exclude_patterns: lookup("EXCLUDE_PATTERNS")
                .unwrap_or_else(|| defaults::EXCLUDE_PATTERNS.to_string()),
            remote_timeout_secs,
            allowed_origins,
            llm,
        })
    }

    /// Exclude patterns as a trimmed list without blanks.
    pub fn exclude_pattern_list(&self) -> Vec<String> {
        self.exclude_patterns
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_enabled()
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, SettingsError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| SettingsError::Invalid { name, value: v }),
    }
}
