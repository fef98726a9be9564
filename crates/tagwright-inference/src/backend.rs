//! Backend abstraction shared by the provider implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use tagwright_core::{Error, Result};

/// A language model reachable over HTTP that turns a prompt into text.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send one user prompt and return the raw text of the answer.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Backend family name for logging ("openai", "anthropic", "ollama").
    fn name(&self) -> &str;

    fn model(&self) -> &str;
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn request_failed(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Inference(format!("Request timed out: {}", e))
    } else {
        Error::Inference(format!("Request failed: {}", e))
    }
}

/// Pass successful responses through; anything else becomes an inference
/// error carrying the backend's status and body.
pub(crate) async fn check_status(backend: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Inference(format!(
        "{} returned {}: {}",
        backend, status, body
    )))
}
