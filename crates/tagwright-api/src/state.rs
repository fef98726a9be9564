//! Shared application state.

use std::sync::Arc;

use tagwright_core::{EntityKind, Result};
use tagwright_inference::LlmClient;
use tagwright_remote::{PaperlessClient, RemoteGateway};

use crate::config::Settings;

/// State handed to every handler. Holds only immutable settings; remote
/// clients are created per request and dropped with it.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// A fresh remote client scoped to the calling request.
    pub fn paperless(&self) -> Result<PaperlessClient> {
        PaperlessClient::new(
            &self.settings.paperless_url,
            &self.settings.paperless_api_token,
            self.settings.remote_timeout(),
        )
    }

    pub fn gateway(&self, kind: EntityKind) -> Result<RemoteGateway> {
        Ok(self.paperless()?.gateway(kind))
    }

    /// The configured LLM client; [`Error::Config`](tagwright_core::Error::Config)
    /// when none is enabled.
    pub fn llm(&self) -> Result<LlmClient> {
        LlmClient::from_config(&self.settings.llm)
    }
}
