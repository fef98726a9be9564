//! Prefix grouping combined with similarity grouping of the leftovers.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use tagwright_core::defaults;
use tagwright_core::{Group, GroupType, MetadataEntity};

use crate::prefix::group_by_prefix;
use crate::semantic::group_by_similarity;

/// Parameters for [`group_hybrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridConfig {
    pub min_prefix_length: usize,
    pub similarity_threshold: f64,
    pub enable_semantic: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            min_prefix_length: defaults::MIN_PREFIX_LENGTH,
            similarity_threshold: defaults::SIMILARITY_THRESHOLD,
            enable_semantic: true,
        }
    }
}

/// Prefix groups keyed `prefix:<key>`, plus (when enabled) similarity
/// groups over the entities no prefix group claimed.
///
/// No entity appears in more than one group.
pub fn group_hybrid(
    entities: &[MetadataEntity],
    config: &HybridConfig,
) -> BTreeMap<String, Vec<MetadataEntity>> {
    let prefix_groups = group_by_prefix(entities, config.min_prefix_length);

    let claimed: HashSet<i64> = prefix_groups
        .values()
        .flatten()
        .map(|entity| entity.id)
        .collect();

    let mut groups: BTreeMap<String, Vec<MetadataEntity>> = prefix_groups
        .into_iter()
        .map(|(key, members)| (format!("{}{}", GroupType::Prefix.key_prefix(), key), members))
        .collect();

    if config.enable_semantic {
        let remaining: Vec<MetadataEntity> = entities
            .iter()
            .filter(|entity| !claimed.contains(&entity.id))
            .cloned()
            .collect();
        groups.extend(group_by_similarity(&remaining, config.similarity_threshold));
    }

    debug!(
        subsystem = "grouping",
        component = "hybrid",
        input_count = entities.len(),
        result_count = groups.len(),
        enable_semantic = config.enable_semantic,
        "Hybrid grouping complete"
    );
    groups
}

/// Presentation groups in key order, typed by key namespace.
pub fn to_groups(groups: BTreeMap<String, Vec<MetadataEntity>>) -> Vec<Group> {
    groups
        .into_iter()
        .map(|(key, members)| {
            let group_type = GroupType::from_key(&key);
            Group::new(key, group_type, members)
        })
        .collect()
}
