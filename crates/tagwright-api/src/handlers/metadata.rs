//! Metadata entity HTTP handlers.
//!
//! One set of handlers serves tags, correspondents and document types; the
//! router nests them per kind and hands the [`EntityKind`] in as an
//! extension. Every handler re-fetches from the remote, nothing is cached.

use std::collections::{BTreeMap, HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use tagwright_core::{
    defaults, paginate, EntityKind, EntityUpdate, Group, GroupSuggester, GroupType, MergePreview,
    MergeRequest, MetadataEntity, MetadataGateway, Page,
};
use tagwright_grouping::{
    find_low_usage, group_hybrid, to_groups, ExcludePatterns, HybridConfig,
    LowUsageCriteria,
};

use crate::services::MergeOrchestrator;
use crate::{ApiError, AppState};

const LLM_NOT_CONFIGURED: &str =
    "LLM is not configured. Set LLM_TYPE and LLM_API_TOKEN in environment.";

// =============================================================================
// VIEWS
// =============================================================================

/// An entity as rendered to clients, with derived match fields.
#[derive(Debug, Serialize)]
pub struct EntityView {
    #[serde(flatten)]
    pub entity: MetadataEntity,
    pub match_type: String,
    pub is_auto: bool,
}

impl From<MetadataEntity> for EntityView {
    fn from(entity: MetadataEntity) -> Self {
        Self {
            match_type: entity.match_type_name(),
            is_auto: entity.is_auto(),
            entity,
        }
    }
}

/// Response body of every mutating endpoint.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    pub affected_count: usize,
}

impl MutationResponse {
    fn ok(message: String, affected_count: usize) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            affected_count,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MergePreviewResponse {
    pub source_items: Vec<EntityView>,
    pub target_name: String,
    pub total_documents: usize,
    pub document_ids: Vec<i64>,
}

impl From<MergePreview> for MergePreviewResponse {
    fn from(preview: MergePreview) -> Self {
        Self {
            source_items: preview.source_items.into_iter().map(EntityView::from).collect(),
            target_name: preview.target_name,
            total_documents: preview.total_documents,
            document_ids: preview.document_ids,
        }
    }
}

fn views(items: Vec<MetadataEntity>) -> Vec<EntityView> {
    items.into_iter().map(EntityView::from).collect()
}

fn sort_by_name(items: &mut [MetadataEntity]) {
    items.sort_by_cached_key(|e| e.name.to_lowercase());
}

fn page_body(kind: EntityKind, page: Page<EntityView>) -> Value {
    let mut body = Map::new();
    body.insert(kind.item_key().to_string(), json!(page.items));
    body.insert("total".to_string(), json!(page.total));
    body.insert("page".to_string(), json!(page.page));
    body.insert("page_size".to_string(), json!(page.page_size));
    body.insert("total_pages".to_string(), json!(page.total_pages));
    Value::Object(body)
}

fn group_body(kind: EntityKind, group: Group) -> Value {
    let mut body = Map::new();
    body.insert(kind.item_key().to_string(), json!(views(group.members)));
    body.insert("total_documents".to_string(), json!(group.total_documents));
    body.insert("suggested_name".to_string(), json!(group.suggested_name));
    body.insert("group_type".to_string(), json!(group.group_type));
    Value::Object(body)
}

fn groups_body(kind: EntityKind, groups: Vec<Group>) -> Value {
    let total_groups = groups.len();
    let groups: Map<String, Value> = groups
        .into_iter()
        .map(|group| (group.key.clone(), group_body(kind, group)))
        .collect();
    json!({
        "groups": groups,
        "total_groups": total_groups,
    })
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// Validate 1-based page selection, applying defaults.
fn page_params(page: Option<i64>, page_size: Option<i64>) -> Result<(usize, usize), ApiError> {
    let page = page.unwrap_or(defaults::PAGE as i64);
    let page_size = page_size.unwrap_or(defaults::PAGE_SIZE as i64);
    if page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    if page_size < 1 {
        return Err(ApiError::BadRequest(
            "page_size must be at least 1".to_string(),
        ));
    }
    Ok((page as usize, page_size as usize))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Case-insensitive substring of the name.
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LowUsageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub max_docs: Option<u64>,
    pub exclude_auto: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MergeSuggestionsQuery {
    pub min_prefix_length: Option<usize>,
    /// Tags only.
    pub similarity_threshold: Option<f64>,
    /// Tags only.
    pub enable_semantic: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// List one page of entities sorted by name.
///
/// # Query Parameters
/// - `page`: 1-based page (default 1)
/// - `page_size`: entries per page (default 50)
/// - `filter`: case-insensitive substring of the name (optional)
///
/// # Returns
/// - 200 OK with `{<kind>: [...], total, page, page_size, total_pages}`
/// - 400 Bad Request for a page or page size below 1
/// - 502 Bad Gateway if the remote call fails
pub async fn list_entities(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page, page_size) = page_params(query.page, query.page_size)?;
    let mut items = state.gateway(kind)?.list_all().await?;

    if let Some(needle) = query
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
    {
        items.retain(|e| e.name.to_lowercase().contains(&needle));
    }
    sort_by_name(&mut items);

    let page = paginate(items, page, page_size).map(EntityView::from);
    Ok(Json(page_body(kind, page)))
}

/// Every entity, unpaginated, plus whether LLM grouping is available.
pub async fn list_all_entities(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
) -> Result<Json<Value>, ApiError> {
    let mut items = state.gateway(kind)?.list_all().await?;
    sort_by_name(&mut items);

    let mut body = Map::new();
    body.insert("total".to_string(), json!(items.len()));
    body.insert(kind.item_key().to_string(), json!(views(items)));
    body.insert("llm_enabled".to_string(), json!(state.settings.llm_enabled()));
    Ok(Json(Value::Object(body)))
}

/// Entities with few documents, as cleanup candidates.
///
/// Names matching a configured exclude pattern are never listed.
///
/// # Query Parameters
/// - `max_docs`: inclusive document-count ceiling (default 0)
/// - `exclude_auto`: skip auto-matched entities (default true)
/// - `page`, `page_size`: as for listing
pub async fn low_usage(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Query(query): Query<LowUsageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page, page_size) = page_params(query.page, query.page_size)?;
    let entities = state.gateway(kind)?.list_all().await?;

    let criteria = LowUsageCriteria {
        max_docs: query.max_docs.unwrap_or(defaults::LOW_USAGE_MAX_DOCS),
        exclude_patterns: ExcludePatterns::compile(&state.settings.exclude_pattern_list()),
        exclude_auto: query.exclude_auto.unwrap_or(true),
    };
    let mut candidates = find_low_usage(&entities, &criteria);
    sort_by_name(&mut candidates);

    let page = paginate(candidates, page, page_size).map(EntityView::from);
    Ok(Json(page_body(kind, page)))
}

/// Groups of entities that look like duplicates of each other.
///
/// Tags are grouped by prefix and string similarity; other kinds by prefix
/// only, and ignore the similarity parameters. Keys are always namespaced
/// (`prefix:<token>`, `semantic:<token>`).
///
/// # Returns
/// - 200 OK with `{groups: {key: {...}}, total_groups}`
/// - 400 Bad Request for a prefix length below 1 or a threshold outside 0..=1
pub async fn merge_suggestions(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Query(query): Query<MergeSuggestionsQuery>,
) -> Result<Json<Value>, ApiError> {
    let min_prefix_length = query
        .min_prefix_length
        .unwrap_or(defaults::MIN_PREFIX_LENGTH);
    if min_prefix_length < 1 {
        return Err(ApiError::BadRequest(
            "min_prefix_length must be at least 1".to_string(),
        ));
    }

    let entities = state.gateway(kind)?.list_all().await?;

    let config = if kind.supports_similarity_grouping() {
        let similarity_threshold = query
            .similarity_threshold
            .unwrap_or(defaults::SIMILARITY_THRESHOLD);
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(ApiError::BadRequest(
                "similarity_threshold must be between 0 and 1".to_string(),
            ));
        }
        HybridConfig {
            min_prefix_length,
            similarity_threshold,
            enable_semantic: query.enable_semantic.unwrap_or(true),
        }
    } else {
        HybridConfig {
            min_prefix_length,
            enable_semantic: false,
            ..HybridConfig::default()
        }
    };
    let groups = to_groups(group_hybrid(&entities, &config));

    Ok(Json(groups_body(kind, groups)))
}

/// Ask the configured LLM to group entities by meaning.
///
/// Names the model returns that match no entity exactly are skipped.
///
/// # Returns
/// - 200 OK with `{groups: {name: {...}}, total_groups}`
/// - 400 Bad Request if no LLM is configured
/// - 502 Bad Gateway if the remote or the LLM backend fails
pub async fn llm_groups(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
) -> Result<Json<Value>, ApiError> {
    if !state.settings.llm_enabled() {
        return Err(ApiError::BadRequest(LLM_NOT_CONFIGURED.to_string()));
    }
    let llm = state.llm()?;
    let entities = state.gateway(kind)?.list_all().await?;
    let names: Vec<String> = entities.iter().map(|e| e.name.clone()).collect();

    let suggested = llm.suggest_groups(&names, kind.api_path()).await?;
    let groups = match_llm_groups(&entities, suggested);

    info!(
        subsystem = "api",
        entity_kind = %kind,
        backend = llm.backend_name(),
        result_count = groups.len(),
        "LLM grouping complete"
    );
    Ok(Json(groups_body(kind, groups)))
}

/// Map LLM-named groups back onto entities by exact name.
fn match_llm_groups(
    entities: &[MetadataEntity],
    suggested: BTreeMap<String, Vec<String>>,
) -> Vec<Group> {
    let mut by_name: HashMap<&str, &MetadataEntity> = HashMap::new();
    for entity in entities {
        by_name.entry(entity.name.as_str()).or_insert(entity);
    }

    let mut groups = Vec::new();
    for (group_name, names) in suggested {
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        for name in &names {
            match by_name.get(name.as_str()) {
                Some(entity) if seen.insert(entity.id) => members.push((*entity).clone()),
                Some(_) => {}
                None => warn!(group = %group_name, name = %name, "LLM returned unknown name"),
            }
        }
        if members.len() >= 2 {
            groups.push(Group::with_suggested_name(
                group_name.clone(),
                GroupType::Llm,
                members,
                group_name,
            ));
        }
    }
    groups
}

// =============================================================================
// MUTATING HANDLERS
// =============================================================================

/// Update an entity's mutable fields.
///
/// # Request Body
/// Any of `name`, `color` (tags only), `match`, `matching_algorithm` (0-6),
/// `is_insensitive`.
///
/// # Returns
/// - 200 OK with `{success, message, affected_count}`
/// - 400 Bad Request when no applicable field is given
pub async fn update_entity(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<i64>,
    Json(update): Json<EntityUpdate>,
) -> Result<Json<MutationResponse>, ApiError> {
    let update = update.for_kind(kind);
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if update.matching_algorithm.is_some_and(|a| !a.is_known()) {
        return Err(ApiError::BadRequest(
            "matching_algorithm must be between 0 and 6".to_string(),
        ));
    }

    state.gateway(kind)?.update(id, &update).await?;
    Ok(MutationResponse::ok(
        format!("Updated {} successfully", kind.label()),
        1,
    ))
}

/// Delete several entities at once.
///
/// # Returns
/// - 200 OK with the number actually deleted; ids the remote refused are
///   named in the message
/// - 400 Bad Request for an empty id list
/// - 504 Gateway Timeout when the outcome is unknown
pub async fn delete_entities(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "No {} IDs provided",
            kind.label()
        )));
    }

    let report = state.gateway(kind)?.bulk_delete(&request.ids).await?;

    let mut message = format!("Deleted {} {}s", report.deleted, kind.label());
    if !report.is_complete() {
        message.push_str(&failed_suffix(&report.failed));
    }
    Ok(MutationResponse::ok(message, report.deleted))
}

/// Preview a merge: resolved sources and the union of their documents.
pub async fn merge_preview(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Json(request): Json<MergeRequest>,
) -> Result<Json<MergePreviewResponse>, ApiError> {
    let gateway = state.gateway(kind)?;
    let preview = MergeOrchestrator::new(&gateway).preview(&request).await?;
    Ok(Json(preview.into()))
}

/// Merge entities into a target, creating it when needed.
///
/// # Returns
/// - 200 OK with the number of affected documents
/// - 400 Bad Request for no sources or a blank target name
/// - 404 Not Found when none of the source ids exist
/// - 500 Internal Server Error when documents were moved but the sources
///   could not be deleted
pub async fn merge_entities(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Json(request): Json<MergeRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let gateway = state.gateway(kind)?;
    let outcome = MergeOrchestrator::new(&gateway).merge(&request).await?;

    let mut message = format!(
        "Merged {} {}s into '{}'",
        outcome.merged_count,
        kind.label(),
        outcome.target.name
    );
    if !outcome.deleted.is_complete() {
        message.push_str(&failed_suffix(&outcome.deleted.failed));
    }
    Ok(MutationResponse::ok(message, outcome.affected_document_count))
}

fn failed_suffix(failed: &[i64]) -> String {
    let ids: Vec<String> = failed.iter().map(i64::to_string).collect();
    format!(" ({} could not be deleted: {})", failed.len(), ids.join(", "))
}
