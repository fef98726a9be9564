//! Bulk deletion with a per-id fallback.
//!
//! Older remotes have no `/api/bulk_edit_objects/` endpoint. When it answers
//! 404 the ids are deleted one by one in batches, and a failing id is
//! recorded without stopping the rest.

use std::time::Instant;

use reqwest::Method;
use serde_json::json;
use tracing::{info, instrument, warn};

use tagwright_core::defaults;
use tagwright_core::{DeleteReport, EntityKind, Error, Result};

use crate::client::PaperlessClient;

impl PaperlessClient {
    /// Delete every id of `kind`.
    ///
    /// # Returns
    ///
    /// - `Ok(report)` when the bulk call succeeded, or when the fallback ran
    ///   (check `report.failed` for ids that could not be deleted)
    /// - `Err(Error::Remote)` for any non-404 failure of the bulk call
    /// - `Err(Error::Timeout)` when the bulk call ran out of time; some ids
    ///   may have been deleted anyway
    #[instrument(skip(self, ids), fields(subsystem = "remote", component = "bulk_delete", op = "bulk_delete", entity_kind = %kind, input_count = ids.len()))]
    pub async fn bulk_delete(&self, kind: EntityKind, ids: &[i64]) -> Result<DeleteReport> {
        if ids.is_empty() {
            return Ok(DeleteReport::default());
        }
        let start = Instant::now();

        let body = json!({
            "objects": ids,
            "object_type": kind.api_path(),
            "operation": "delete",
        });
        let sent = self
            .request(Method::POST, "/api/bulk_edit_objects/")
            .json(&body)
            .send()
            .await;

        let outcome = match sent {
            Ok(response) => Self::check(response).await.map(|_| ()),
            Err(e) if e.is_timeout() => Err(timeout_error(kind, ids.len())),
            Err(e) => Err(Error::from(e)),
        };

        let report = match outcome {
            Ok(()) => DeleteReport::all_deleted(ids.len()),
            Err(e) if e.is_remote_not_found() => {
                warn!("Bulk delete endpoint unavailable, deleting individually");
                self.delete_individually(kind, ids).await
            }
            Err(e) => return Err(e),
        };

        info!(
            deleted = report.deleted,
            failed = report.failed.len(),
            used_fallback = report.used_fallback,
            duration_ms = start.elapsed().as_millis() as u64,
            "Deleted {} {}s",
            report.deleted,
            kind.label()
        );
        Ok(report)
    }

    async fn delete_individually(&self, kind: EntityKind, ids: &[i64]) -> DeleteReport {
        let mut report = DeleteReport {
            requested: ids.len(),
            used_fallback: true,
            ..Default::default()
        };

        for batch in ids.chunks(defaults::DELETE_BATCH_SIZE) {
            for &id in batch {
                match self.delete_one(kind, id).await {
                    Ok(()) => report.deleted += 1,
                    Err(e) => {
                        warn!(entity_id = id, error = %e, "Failed to delete {}", kind.label());
                        report.failed.push(id);
                    }
                }
            }
        }
        report
    }

    async fn delete_one(&self, kind: EntityKind, id: i64) -> Result<()> {
        let path = format!("/api/{}/{}/", kind.api_path(), id);
        let response = self.request(Method::DELETE, &path).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

fn timeout_error(kind: EntityKind, count: usize) -> Error {
    Error::Timeout(format!(
        "deleting {} {}s. The {}s may still be deleted - please refresh to verify.",
        count,
        kind.label(),
        kind.label()
    ))
}
