//! [`MetadataGateway`] over the Paperless-ngx REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, field, info, instrument, Span};

use tagwright_core::{defaults, logging};
use tagwright_core::{
    DeleteReport, Document, EntityKind, EntityUpdate, MetadataEntity, MetadataGateway, Result,
};

use crate::client::PaperlessClient;
use crate::wire::{PageResponse, WireDocument, WireEntity};

/// The remote's per-kind document filter and bulk-edit method.
struct KindWire {
    documents_filter: &'static str,
    assign_method: &'static str,
    assign_parameter: &'static str,
}

fn kind_wire(kind: EntityKind) -> KindWire {
    match kind {
        EntityKind::Tag => KindWire {
            documents_filter: "tags__id__in",
            assign_method: "add_tag",
            assign_parameter: "tag",
        },
        EntityKind::Correspondent => KindWire {
            documents_filter: "correspondent__id",
            assign_method: "set_correspondent",
            assign_parameter: "correspondent",
        },
        EntityKind::DocumentType => KindWire {
            documents_filter: "document_type__id",
            assign_method: "set_document_type",
            assign_parameter: "document_type",
        },
    }
}

/// Gateway for one entity kind.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: PaperlessClient,
    kind: EntityKind,
}

impl RemoteGateway {
    pub fn new(client: PaperlessClient, kind: EntityKind) -> Self {
        Self { client, kind }
    }

    pub fn client(&self) -> &PaperlessClient {
        &self.client
    }

    fn collection_path(&self) -> String {
        format!("/api/{}/", self.kind.api_path())
    }

    fn item_path(&self, id: i64) -> String {
        format!("/api/{}/{}/", self.kind.api_path(), id)
    }
}

#[async_trait]
impl MetadataGateway for RemoteGateway {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    #[instrument(skip(self), fields(subsystem = "remote", component = "gateway", op = "list_all", entity_kind = %self.kind, result_count = field::Empty))]
    async fn list_all(&self) -> Result<Vec<MetadataEntity>> {
        let wire: Vec<WireEntity> = self
            .client
            .get_all_pages(
                &self.collection_path(),
                &[("page_size", defaults::REMOTE_PAGE_SIZE)],
            )
            .await?;
        Span::current().record(logging::RESULT_COUNT, wire.len());
        Ok(wire.into_iter().map(|w| w.into_entity(self.kind)).collect())
    }

    #[instrument(skip(self), fields(subsystem = "remote", component = "gateway", op = "get_by_name", entity_kind = %self.kind))]
    async fn get_by_name(&self, name: &str) -> Result<Option<MetadataEntity>> {
        let page: PageResponse<WireEntity> = self
            .client
            .get_json(&self.collection_path(), &[("name__iexact", name)])
            .await?;
        let found = page
            .results
            .into_iter()
            .next()
            .map(|w| w.into_entity(self.kind));
        debug!(found = found.is_some(), "Name lookup complete");
        Ok(found)
    }

    #[instrument(skip(self), fields(subsystem = "remote", component = "gateway", op = "create", entity_kind = %self.kind))]
    async fn create(&self, name: &str) -> Result<MetadataEntity> {
        let wire: WireEntity = self
            .client
            .send_json(Method::POST, &self.collection_path(), &json!({ "name": name }))
            .await?;
        let entity = wire.into_entity(self.kind);
        info!(entity_id = entity.id, name = %entity.name, "Created {}", self.kind.label());
        Ok(entity)
    }

    #[instrument(skip(self, update), fields(subsystem = "remote", component = "gateway", op = "update", entity_kind = %self.kind, entity_id = id))]
    async fn update(&self, id: i64, update: &EntityUpdate) -> Result<MetadataEntity> {
        let update = update.clone().for_kind(self.kind);
        let wire: WireEntity = self
            .client
            .send_json(Method::PATCH, &self.item_path(id), &update)
            .await?;
        info!("Updated {}", self.kind.label());
        Ok(wire.into_entity(self.kind))
    }

    async fn bulk_delete(&self, ids: &[i64]) -> Result<DeleteReport> {
        self.client.bulk_delete(self.kind, ids).await
    }

    #[instrument(skip(self), fields(subsystem = "remote", component = "gateway", op = "documents_for", entity_kind = %self.kind, entity_id = id))]
    async fn documents_for(&self, id: i64) -> Result<Vec<Document>> {
        let wire = kind_wire(self.kind);
        let id = id.to_string();
        let page_size = defaults::REMOTE_PAGE_SIZE.to_string();
        let docs: Vec<WireDocument> = self
            .client
            .get_all_pages(
                "/api/documents/",
                &[
                    (wire.documents_filter, id.as_str()),
                    ("page_size", page_size.as_str()),
                ],
            )
            .await?;
        Ok(docs.into_iter().map(Document::from).collect())
    }

    #[instrument(skip(self, document_ids), fields(subsystem = "remote", component = "gateway", op = "assign_to_documents", entity_kind = %self.kind, entity_id = entity_id, document_count = document_ids.len()))]
    async fn assign_to_documents(&self, document_ids: &[i64], entity_id: i64) -> Result<()> {
        if document_ids.is_empty() {
            return Ok(());
        }
        let wire = kind_wire(self.kind);
        let body = json!({
            "documents": document_ids,
            "method": wire.assign_method,
            "parameters": { (wire.assign_parameter): entity_id },
        });
        self.client
            .send_json_unit(Method::POST, "/api/documents/bulk_edit/", &body)
            .await?;
        info!("Assigned {} to documents", self.kind.label());
        Ok(())
    }
}
