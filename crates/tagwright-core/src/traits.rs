//! Core traits for tagwright abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, so the merge orchestrator and request handlers are written
//! once and tested against in-memory substitutes.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// METADATA GATEWAY
// =============================================================================

/// Operations on one kind of metadata entity held by the remote system.
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// The entity kind this gateway operates on.
    fn kind(&self) -> EntityKind;

    /// Fetch every entity of this kind, following remote pagination.
    async fn list_all(&self) -> Result<Vec<MetadataEntity>>;

    /// Find an entity by exact, case-insensitive name.
    async fn get_by_name(&self, name: &str) -> Result<Option<MetadataEntity>>;

    /// Create a new entity with the given name.
    async fn create(&self, name: &str) -> Result<MetadataEntity>;

    /// Apply a partial update and return the updated entity.
    async fn update(&self, id: i64, update: &EntityUpdate) -> Result<MetadataEntity>;

    /// Delete many entities, falling back to per-id deletion when the
    /// remote has no bulk endpoint.
    async fn bulk_delete(&self, ids: &[i64]) -> Result<DeleteReport>;

    /// Documents currently associated with the entity.
    async fn documents_for(&self, id: i64) -> Result<Vec<Document>>;

    /// Associate the entity with every listed document in a single call.
    async fn assign_to_documents(&self, document_ids: &[i64], id: i64) -> Result<()>;
}

// =============================================================================
// GROUP SUGGESTION
// =============================================================================

/// Source of semantic group suggestions (an LLM backend).
///
/// An unparseable answer yields an empty map; only transport failures are
/// errors.
#[async_trait]
pub trait GroupSuggester: Send + Sync {
    /// Suggest groups of related names. `item_type` names the kind of items
    /// ("tags", "correspondents", ...) for the prompt.
    async fn suggest_groups(
        &self,
        names: &[String],
        item_type: &str,
    ) -> Result<BTreeMap<String, Vec<String>>>;

    /// Backend identifier for logs.
    fn backend_name(&self) -> &str;
}
