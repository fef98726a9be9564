//! Centralized default constants for tagwright.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own numbers.

// =============================================================================
// REMOTE (PAPERLESS)
// =============================================================================

/// Request budget for calls against the remote system (seconds).
///
/// Bulk deletes of large selections are processed slowly by the remote.
pub const REMOTE_TIMEOUT_SECS: u64 = 120;

/// Page size requested when walking the remote's paginated collections.
pub const REMOTE_PAGE_SIZE: usize = 100;

/// Number of ids deleted per batch when the bulk endpoint is unavailable.
pub const DELETE_BATCH_SIZE: usize = 10;

/// Color the remote assigns to tags created without one.
pub const TAG_COLOR: &str = "#a6cee3";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page for list endpoints (1-based).
pub const PAGE: usize = 1;

/// Default page size for list endpoints.
pub const PAGE_SIZE: usize = 50;

// =============================================================================
// LOW USAGE
// =============================================================================

/// Default inclusive document-count ceiling for low-usage candidates.
pub const LOW_USAGE_MAX_DOCS: u64 = 0;

/// Default comma-separated name patterns excluded from low-usage results.
pub const EXCLUDE_PATTERNS: &str = "new,inbox,todo,review";

// =============================================================================
// GROUPING
// =============================================================================

/// Minimum prefix length (characters) for prefix grouping.
pub const MIN_PREFIX_LENGTH: usize = 3;

/// Pairwise name similarity at or above which two entities are grouped.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

// =============================================================================
// INFERENCE
// =============================================================================

/// Request budget for LLM backends (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 60;

/// Language the LLM is asked to name groups in.
pub const LLM_LANGUAGE: &str = "English";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI model.
pub const OPENAI_MODEL: &str = "gpt-5-mini";

/// Default Anthropic endpoint.
pub const ANTHROPIC_URL: &str = "https://api.anthropic.com";

/// Default Anthropic model.
pub const ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama model.
pub const OLLAMA_MODEL: &str = "llama3";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 8000;
