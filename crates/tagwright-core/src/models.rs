//! Metadata model shared across tagwright crates.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENTITY KIND
// =============================================================================

/// The three kinds of remote metadata the consolidation engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Tag,
    Correspondent,
    DocumentType,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Tag,
        EntityKind::Correspondent,
        EntityKind::DocumentType,
    ];

    /// Path segment of the kind on the remote API and on our own routes.
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Correspondent => "correspondents",
            Self::DocumentType => "document_types",
        }
    }

    /// JSON key under which lists of this kind are returned.
    pub fn item_key(&self) -> &'static str {
        self.api_path()
    }

    /// Singular human label, used in messages ("Deleted 3 tags").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Correspondent => "correspondent",
            Self::DocumentType => "document type",
        }
    }

    /// Only tags carry a color.
    pub fn has_color(&self) -> bool {
        matches!(self, Self::Tag)
    }

    /// Whether merge suggestions for this kind may use string similarity
    /// in addition to prefixes.
    pub fn supports_similarity_grouping(&self) -> bool {
        matches!(self, Self::Tag)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_path())
    }
}

// =============================================================================
// MATCHING ALGORITHM
// =============================================================================

/// The remote system's auto-assignment rule for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MatchingAlgorithm {
    #[default]
    None,
    Any,
    All,
    Literal,
    Regex,
    Fuzzy,
    Auto,
    /// A value this build does not know; preserved as received.
    Other(u8),
}

impl MatchingAlgorithm {
    /// Human-readable name; unknown values render as their number.
    pub fn display_name(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Any => "Any".to_string(),
            Self::All => "All".to_string(),
            Self::Literal => "Literal".to_string(),
            Self::Regex => "Regex".to_string(),
            Self::Fuzzy => "Fuzzy".to_string(),
            Self::Auto => "Auto".to_string(),
            Self::Other(n) => n.to_string(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<u8> for MatchingAlgorithm {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Any,
            2 => Self::All,
            3 => Self::Literal,
            4 => Self::Regex,
            5 => Self::Fuzzy,
            6 => Self::Auto,
            n => Self::Other(n),
        }
    }
}

impl From<MatchingAlgorithm> for u8 {
    fn from(value: MatchingAlgorithm) -> Self {
        match value {
            MatchingAlgorithm::None => 0,
            MatchingAlgorithm::Any => 1,
            MatchingAlgorithm::All => 2,
            MatchingAlgorithm::Literal => 3,
            MatchingAlgorithm::Regex => 4,
            MatchingAlgorithm::Fuzzy => 5,
            MatchingAlgorithm::Auto => 6,
            MatchingAlgorithm::Other(n) => n,
        }
    }
}

// =============================================================================
// ENTITIES AND DOCUMENTS
// =============================================================================

/// A tag, correspondent or document type as last fetched from the remote.
///
/// `document_count` is a snapshot and `id` is the only stable reference
/// across calls; names can change through updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntity {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Present only on tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub matching_algorithm: MatchingAlgorithm,
    #[serde(rename = "match")]
    pub match_pattern: String,
    pub is_insensitive: bool,
    pub document_count: u64,
}

impl MetadataEntity {
    /// Build an entity with defaults for everything but id, name and count.
    pub fn new(id: i64, name: impl Into<String>, document_count: u64) -> Self {
        let name = name.into();
        Self {
            id,
            slug: name.to_lowercase().replace(' ', "-"),
            name,
            color: None,
            matching_algorithm: MatchingAlgorithm::None,
            match_pattern: String::new(),
            is_insensitive: true,
            document_count,
        }
    }

    pub fn with_algorithm(mut self, algorithm: MatchingAlgorithm) -> Self {
        self.matching_algorithm = algorithm;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn match_type_name(&self) -> String {
        self.matching_algorithm.display_name()
    }

    pub fn is_auto(&self) -> bool {
        self.matching_algorithm == MatchingAlgorithm::Auto
    }

    /// Sort key used for every member ordering: most documents first,
    /// then case-insensitive name.
    pub fn usage_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.document_count
            .cmp(&a.document_count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    }
}

/// Minimal projection of a remote document, used as a join key during merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

/// Partial update of an entity's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        rename = "match",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub match_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_algorithm: Option<MatchingAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_insensitive: Option<bool>,
}

impl EntityUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.match_pattern.is_none()
            && self.matching_algorithm.is_none()
            && self.is_insensitive.is_none()
    }

    pub fn without_color(mut self) -> Self {
        self.color = None;
        self
    }

    /// Drop the color for kinds that do not carry one.
    pub fn for_kind(self, kind: EntityKind) -> Self {
        if kind.has_color() {
            self
        } else {
            self.without_color()
        }
    }
}

// =============================================================================
// GROUPS
// =============================================================================

/// Origin of a merge suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Prefix,
    Semantic,
    Llm,
}

impl GroupType {
    /// Namespace prefix used in hybrid group keys.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Prefix => "prefix:",
            Self::Semantic => "semantic:",
            Self::Llm => "llm:",
        }
    }

    /// Infer the type of a hybrid group from its key.
    pub fn from_key(key: &str) -> Self {
        if key.starts_with(Self::Semantic.key_prefix()) {
            Self::Semantic
        } else if key.starts_with(Self::Llm.key_prefix()) {
            Self::Llm
        } else {
            Self::Prefix
        }
    }
}

/// A suggested cluster of entities to merge. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: String,
    pub group_type: GroupType,
    pub members: Vec<MetadataEntity>,
    pub total_documents: u64,
    pub suggested_name: String,
}

impl Group {
    /// Build a group from members already in presentation order; the first
    /// (most used) member's name is the suggested merge target.
    pub fn new(key: impl Into<String>, group_type: GroupType, members: Vec<MetadataEntity>) -> Self {
        let suggested_name = members.first().map(|m| m.name.clone()).unwrap_or_default();
        Self::with_suggested_name(key, group_type, members, suggested_name)
    }

    pub fn with_suggested_name(
        key: impl Into<String>,
        group_type: GroupType,
        members: Vec<MetadataEntity>,
        suggested_name: impl Into<String>,
    ) -> Self {
        let total_documents = members.iter().map(|m| m.document_count).sum();
        Self {
            key: key.into(),
            group_type,
            members,
            total_documents,
            suggested_name: suggested_name.into(),
        }
    }
}

// =============================================================================
// DELETE AND MERGE
// =============================================================================

/// What a bulk delete actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub requested: usize,
    pub deleted: usize,
    /// Ids whose individual deletion failed on the fallback path.
    pub failed: Vec<i64>,
    /// True when the bulk endpoint was unavailable and ids were deleted one by one.
    pub used_fallback: bool,
}

impl DeleteReport {
    pub fn all_deleted(count: usize) -> Self {
        Self {
            requested: count,
            deleted: count,
            failed: Vec::new(),
            used_fallback: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sources to fold into a (possibly new) target entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub source_ids: Vec<i64>,
    #[serde(default)]
    pub target_name: String,
}

/// Scope of a merge, computed without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePreview {
    pub source_items: Vec<MetadataEntity>,
    pub target_name: String,
    pub total_documents: usize,
    /// Ascending, deduplicated.
    pub document_ids: Vec<i64>,
}

/// Result of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub merged_count: usize,
    pub affected_document_count: usize,
    pub target: MetadataEntity,
    pub deleted: DeleteReport,
}
