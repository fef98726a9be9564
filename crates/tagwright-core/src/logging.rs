//! Structured logging schema for tagwright.
//!
//! Event and span fields are written as identifiers at the call site
//! (`subsystem = "remote"`, `component`, `op`, `entity_kind`, `entity_id`,
//! `input_count`, `duration_ms`). The constants below name the fields that
//! spans declare as `field::Empty` and fill in later with `Span::record`,
//! which takes the field name as a string.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), completed mutations |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (pages fetched, pairs compared) |

/// Merge target name, known once the target is resolved or created.
pub const TARGET_NAME: &str = "target_name";

/// Number of documents touched by a mutation.
pub const DOCUMENT_COUNT: &str = "document_count";

/// Number of results returned.
pub const RESULT_COUNT: &str = "result_count";
