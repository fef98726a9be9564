//! Similarity grouping of near-duplicate names.
//!
//! Every pair of names is scored; pairs at or above the threshold are joined
//! with union-find and each connected component of two or more entities
//! becomes a group keyed `semantic:<token>`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use strsim::normalized_levenshtein;
use tracing::debug;

use tagwright_core::{GroupType, MetadataEntity};

use crate::prefix::tokenize;

/// Symmetric similarity in `[0, 1]` of two names, ignoring case.
///
/// The larger of the normalized edit-distance similarity of the whole names
/// and the Jaccard overlap of their token sets, so both `invoice`/`invoices`
/// and `tax 2024`/`2024 tax` score high.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }
    normalized_levenshtein(&a, &b).max(token_jaccard(&a, &b))
}

fn token_set(name: &str) -> BTreeSet<String> {
    tokenize(name).into_iter().filter(|t| !t.is_empty()).collect()
}

fn token_jaccard(a: &str, b: &str) -> f64 {
    let a = token_set(a);
    let b = token_set(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

fn find(parent: &mut [usize], i: usize) -> usize {
    if parent[i] != i {
        parent[i] = find(parent, parent[i]);
    }
    parent[i]
}

fn union(parent: &mut [usize], i: usize, j: usize) {
    let pi = find(parent, i);
    let pj = find(parent, j);
    if pi != pj {
        parent[pi] = pj;
    }
}

/// Representative token of a sorted component: first token of the most
/// used member's name.
fn representative(members: &[MetadataEntity]) -> String {
    let name = members
        .first()
        .map(|m| m.name.to_lowercase())
        .unwrap_or_default();
    tokenize(&name)
        .into_iter()
        .find(|t| !t.is_empty())
        .unwrap_or(name)
}

/// Cluster entities whose names score at least `similarity_threshold`.
///
/// Keys collide when two components share a representative token; later
/// components get `-2`, `-3`, ... appended.
pub fn group_by_similarity(
    entities: &[MetadataEntity],
    similarity_threshold: f64,
) -> BTreeMap<String, Vec<MetadataEntity>> {
    let n = entities.len();
    let mut parent: Vec<usize> = (0..n).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            if name_similarity(&entities[i].name, &entities[j].name) >= similarity_threshold {
                union(&mut parent, i, j);
            }
        }
    }

    let mut components: HashMap<usize, Vec<MetadataEntity>> = HashMap::new();
    for (i, entity) in entities.iter().enumerate() {
        let root = find(&mut parent, i);
        components.entry(root).or_default().push(entity.clone());
    }

    let mut components: Vec<Vec<MetadataEntity>> = components
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|mut members| {
            members.sort_by(MetadataEntity::usage_order);
            members
        })
        .collect();
    components.sort_by(|a, b| MetadataEntity::usage_order(&a[0], &b[0]).then(a[0].id.cmp(&b[0].id)));

    let mut groups = BTreeMap::new();
    for members in components {
        let base = format!("{}{}", GroupType::Semantic.key_prefix(), representative(&members));
        let mut key = base.clone();
        let mut suffix = 2;
        while groups.contains_key(&key) {
            key = format!("{base}-{suffix}");
            suffix += 1;
        }
        groups.insert(key, members);
    }

    debug!(
        subsystem = "grouping",
        component = "semantic",
        input_count = n,
        result_count = groups.len(),
        similarity_threshold,
        "Similarity grouping complete"
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tag(id: i64, name: &str, doc_count: u64) -> MetadataEntity {
        MetadataEntity::new(id, name, doc_count)
    }

    #[test]
    fn test_similarity_is_symmetric_and_bounded() {
        let pairs = [("invoice", "invoices"), ("bill", "Invoice"), ("", "x")];
        for (a, b) in pairs {
            let ab = name_similarity(a, b);
            assert_eq!(ab, name_similarity(b, a));
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn test_similarity_ignores_case() {
        assert_eq!(name_similarity("Invoice", "INVOICE"), 1.0);
    }

    #[test]
    fn test_token_overlap_scores_reordered_names() {
        assert_eq!(name_similarity("tax 2024", "2024 tax"), 1.0);
    }

    #[test]
    fn test_groups_plural_variants() {
        let tags = vec![
            make_tag(1, "invoice", 3),
            make_tag(2, "invoices", 10),
            make_tag(3, "bill", 1),
        ];
        let groups = group_by_similarity(&tags, 0.8);
        assert_eq!(groups.len(), 1);
        let members = &groups["semantic:invoices"];
        assert_eq!(members[0].name, "invoices");
        assert_eq!(members[1].name, "invoice");
    }

    #[test]
    fn test_transitive_closure() {
        // receipt~receipts and receipts~receipts2 but receipt~receipts2 is lower
        let tags = vec![
            make_tag(1, "receipt", 1),
            make_tag(2, "receipts", 2),
            make_tag(3, "receipts2", 3),
        ];
        let groups = group_by_similarity(&tags, 0.85);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.values().next().unwrap().len(), 3);
    }

    #[test]
    fn test_singletons_discarded() {
        let tags = vec![make_tag(1, "alpha", 1), make_tag(2, "zebra", 1)];
        assert!(group_by_similarity(&tags, 0.8).is_empty());
    }

    #[test]
    fn test_key_collisions_get_suffixes() {
        let tags = vec![
            make_tag(1, "tax return", 9),
            make_tag(2, "tax returns", 8),
            make_tag(3, "tax office", 5),
            make_tag(4, "tax offices", 4),
        ];
        let groups = group_by_similarity(&tags, 0.9);
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec!["semantic:tax", "semantic:tax-2"]);
        assert_eq!(groups["semantic:tax"][0].name, "tax return");
        assert_eq!(groups["semantic:tax-2"][0].name, "tax office");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_similarity(&[], 0.8).is_empty());
    }

    #[test]
    fn test_threshold_one_requires_identical_names() {
        let tags = vec![
            make_tag(1, "Invoice", 1),
            make_tag(2, "invoice", 2),
            make_tag(3, "invoices", 3),
        ];
        let groups = group_by_similarity(&tags, 1.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["semantic:invoice"].len(), 2);
    }
}
