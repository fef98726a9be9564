//! Merge orchestration.
//!
//! Folds several entities of one kind into a single target: every document
//! carrying any source ends up carrying the target, then the sources are
//! deleted. The sequence is not transactional. Document assignment happens
//! before deletion, so an interrupted merge leaves documents on the target
//! and the sources still present; a retry converges.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

use tracing::{debug, field, info, instrument, warn, Span};

use tagwright_core::logging;
use tagwright_core::{
    Error, MergeOutcome, MergePreview, MergeRequest, MetadataEntity, MetadataGateway, Result,
};

/// Runs previews and merges against one gateway.
pub struct MergeOrchestrator<'a, G: MetadataGateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: MetadataGateway + ?Sized> MergeOrchestrator<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Compute the scope of a merge without changing anything remotely.
    #[instrument(skip(self, request), fields(subsystem = "api", component = "merge", op = "preview", entity_kind = %self.gateway.kind()))]
    pub async fn preview(&self, request: &MergeRequest) -> Result<MergePreview> {
        let target_name = self.validate(request)?;
        let sources = self.resolve_sources(&request.source_ids).await?;
        let document_ids = self.document_union(&sources).await?;

        Ok(MergePreview {
            total_documents: document_ids.len(),
            document_ids: document_ids.into_iter().collect(),
            source_items: sources,
            target_name,
        })
    }

    /// Merge the sources into the target, creating the target if needed.
    #[instrument(skip(self, request), fields(subsystem = "api", component = "merge", op = "merge", entity_kind = %self.gateway.kind(), target_name = field::Empty, document_count = field::Empty))]
    pub async fn merge(&self, request: &MergeRequest) -> Result<MergeOutcome> {
        let start = Instant::now();
        let label = self.gateway.kind().label();
        let target_name = self.validate(request)?;
        let sources = self.resolve_sources(&request.source_ids).await?;

        let target = match self.gateway.get_by_name(&target_name).await? {
            Some(existing) => {
                debug!(entity_id = existing.id, "Merging into existing {}", label);
                existing
            }
            None => self.gateway.create(&target_name).await?,
        };
        let span = Span::current();
        span.record(logging::TARGET_NAME, target.name.as_str());

        let document_ids: Vec<i64> = self.document_union(&sources).await?.into_iter().collect();
        span.record(logging::DOCUMENT_COUNT, document_ids.len());
        if !document_ids.is_empty() {
            self.gateway
                .assign_to_documents(&document_ids, target.id)
                .await?;
        }

        let to_delete: Vec<i64> = sources
            .iter()
            .map(|s| s.id)
            .filter(|id| *id != target.id)
            .collect();

        let deleted = match self.gateway.bulk_delete(&to_delete).await {
            Ok(report) => report,
            Err(e) if document_ids.is_empty() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Documents reassigned but source deletion failed");
                return Err(Error::MergeIncomplete {
                    target: target.name,
                    reason: e.to_string(),
                });
            }
        };
        if !deleted.is_complete() {
            warn!(failed = ?deleted.failed, "Some merged {}s could not be deleted", label);
        }

        info!(
            merged = sources.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Merge complete"
        );

        Ok(MergeOutcome {
            merged_count: sources.len(),
            affected_document_count: document_ids.len(),
            target,
            deleted,
        })
    }

    /// Check the request and return the trimmed target name.
    fn validate(&self, request: &MergeRequest) -> Result<String> {
        let label = self.gateway.kind().label();
        if request.source_ids.is_empty() {
            return Err(Error::InvalidInput(format!("No source {label} IDs provided")));
        }
        let target_name = request.target_name.trim();
        if target_name.is_empty() {
            return Err(Error::InvalidInput("No target name provided".to_string()));
        }
        Ok(target_name.to_string())
    }

    /// Resolve ids against the current entity list, in order of first
    /// appearance. Unknown ids are dropped.
    async fn resolve_sources(&self, source_ids: &[i64]) -> Result<Vec<MetadataEntity>> {
        let mut by_id: HashMap<i64, MetadataEntity> = self
            .gateway
            .list_all()
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut seen = HashSet::new();
        let sources: Vec<MetadataEntity> = source_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| by_id.remove(id))
            .collect();

        if sources.len() < seen.len() {
            debug!(
                requested = seen.len(),
                resolved = sources.len(),
                "Ignoring unknown source ids"
            );
        }
        if sources.is_empty() {
            return Err(Error::NotFound(format!(
                "No valid source {}s found",
                self.gateway.kind().label()
            )));
        }
        Ok(sources)
    }

    async fn document_union(&self, sources: &[MetadataEntity]) -> Result<BTreeSet<i64>> {
        let mut ids = BTreeSet::new();
        for source in sources {
            let docs = self.gateway.documents_for(source.id).await?;
            ids.extend(docs.into_iter().map(|d| d.id));
        }
        Ok(ids)
    }
}
