//! Remote payload shapes. Every optional field falls back the way the remote
//! documents its defaults.

use serde::Deserialize;

use tagwright_core::defaults;
use tagwright_core::{Document, EntityKind, MatchingAlgorithm, MetadataEntity};

/// One page of a paginated list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEntity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub matching_algorithm: MatchingAlgorithm,
    #[serde(default, rename = "match")]
    pub match_pattern: String,
    #[serde(default = "default_insensitive")]
    pub is_insensitive: bool,
    #[serde(default)]
    pub document_count: u64,
}

fn default_insensitive() -> bool {
    true
}

impl WireEntity {
    pub fn into_entity(self, kind: EntityKind) -> MetadataEntity {
        let color = if kind.has_color() {
            Some(self.color.unwrap_or_else(|| defaults::TAG_COLOR.to_string()))
        } else {
            None
        };
        MetadataEntity {
            id: self.id,
            name: self.name,
            slug: self.slug,
            color,
            matching_algorithm: self.matching_algorithm,
            match_pattern: self.match_pattern,
            is_insensitive: self.is_insensitive,
            document_count: self.document_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDocument {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<WireDocument> for Document {
    fn from(doc: WireDocument) -> Self {
        Document {
            id: doc.id,
            title: doc.title.unwrap_or_default(),
        }
    }
}
