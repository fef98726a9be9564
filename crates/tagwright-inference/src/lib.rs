//! # tagwright-inference
//!
//! Asks a language model which metadata names belong together.
//!
//! Three backend families sit behind [`LlmBackend`]: OpenAI-compatible chat
//! completions, Anthropic messages, and Ollama generate. [`LlmClient`] builds
//! the prompt, calls the configured backend and parses whatever comes back
//! into a `group name -> member names` map, implementing
//! [`GroupSuggester`](tagwright_core::GroupSuggester).
//!
//! A response that cannot be parsed yields no suggestions; failing to reach
//! the backend is an error.

pub mod anthropic;
pub mod backend;
pub mod client;
pub mod config;
pub mod ollama;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use backend::LlmBackend;
pub use client::LlmClient;
pub use config::{ConfigError, LlmBackendKind, LlmConfig};
pub use ollama::{OllamaBackend, OllamaConfig};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use parse::parse_groups;
pub use prompt::build_prompt;
