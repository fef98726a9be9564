//! Prefix grouping.
//!
//! A name's prefix key is its first separator-delimited token, or for
//! single-token names its first `min_prefix_length` characters.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use tagwright_core::MetadataEntity;

/// Runs of whitespace, underscores and hyphens.
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_\-]+").unwrap());

/// Lowercase `name` and split it on separator runs.
///
/// Leading or trailing separators produce empty tokens, so `"_draft"`
/// tokenizes as `["", "draft"]`.
pub fn tokenize(name: &str) -> Vec<String> {
    SEPARATORS
        .split(&name.to_lowercase())
        .map(str::to_string)
        .collect()
}

/// Prefix key for `name`, or `None` when the key would be shorter than
/// `min_prefix_length` characters.
pub fn prefix_key(name: &str, min_prefix_length: usize) -> Option<String> {
    let mut tokens = tokenize(name);
    let key = if tokens.len() > 1 {
        tokens.swap_remove(0)
    } else {
        name.to_lowercase().chars().take(min_prefix_length).collect()
    };

    (key.chars().count() >= min_prefix_length).then_some(key)
}

/// Bucket entities by [`prefix_key`], keeping buckets of two or more.
///
/// Members are ordered most-used first, ties by case-insensitive name.
pub fn group_by_prefix(
    entities: &[MetadataEntity],
    min_prefix_length: usize,
) -> BTreeMap<String, Vec<MetadataEntity>> {
    let mut buckets: BTreeMap<String, Vec<MetadataEntity>> = BTreeMap::new();
    for entity in entities {
        if let Some(key) = prefix_key(&entity.name, min_prefix_length) {
            buckets.entry(key).or_default().push(entity.clone());
        }
    }

    buckets.retain(|_, members| members.len() > 1);
    for members in buckets.values_mut() {
        members.sort_by(MetadataEntity::usage_order);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tag(id: i64, name: &str, doc_count: u64) -> MetadataEntity {
        MetadataEntity::new(id, name, doc_count)
    }

    fn names(members: &[MetadataEntity]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_groups_by_common_prefix() {
        let tags = vec![
            make_tag(1, "account balance", 5),
            make_tag(2, "account statement", 3),
            make_tag(3, "other", 1),
        ];
        let groups = group_by_prefix(&tags, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["account"].len(), 2);
    }

    #[test]
    fn test_no_groups_for_unique_tags() {
        let tags = vec![make_tag(1, "unique tag", 1), make_tag(2, "another unique", 1)];
        assert!(group_by_prefix(&tags, 3).is_empty());
    }

    #[test]
    fn test_sorted_by_doc_count() {
        let tags = vec![
            make_tag(1, "test low", 1),
            make_tag(2, "test high", 100),
            make_tag(3, "test medium", 50),
        ];
        let groups = group_by_prefix(&tags, 3);
        assert_eq!(
            names(&groups["test"]),
            vec!["test high", "test medium", "test low"]
        );
    }

    #[test]
    fn test_ties_broken_by_lowercase_name() {
        let tags = vec![
            make_tag(1, "tax Zeta", 2),
            make_tag(2, "tax alpha", 2),
            make_tag(3, "TAX beta", 2),
        ];
        let groups = group_by_prefix(&tags, 3);
        assert_eq!(
            names(&groups["tax"]),
            vec!["tax alpha", "TAX beta", "tax Zeta"]
        );
    }

    #[test]
    fn test_underscore_and_hyphen_separators() {
        let tags = vec![
            make_tag(1, "project_alpha", 1),
            make_tag(2, "project-beta", 1),
            make_tag(3, "Project  gamma", 1),
        ];
        let groups = group_by_prefix(&tags, 3);
        assert_eq!(groups["project"].len(), 3);
    }

    #[test]
    fn test_single_token_uses_leading_characters() {
        let tags = vec![make_tag(1, "invoice", 1), make_tag(2, "invoices", 1)];
        let groups = group_by_prefix(&tags, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["inv"].len(), 2);
    }

    #[test]
    fn test_short_keys_discarded() {
        let tags = vec![
            make_tag(1, "ab", 1),
            make_tag(2, "ab", 1),
            make_tag(3, "x report", 1),
            make_tag(4, "x summary", 1),
        ];
        assert!(group_by_prefix(&tags, 3).is_empty());
    }

    #[test]
    fn test_prefix_key_rules() {
        assert_eq!(prefix_key("Account Balance", 3).as_deref(), Some("account"));
        assert_eq!(prefix_key("Invoices", 3).as_deref(), Some("inv"));
        assert_eq!(prefix_key("Invoices", 5).as_deref(), Some("invoi"));
        assert_eq!(prefix_key("ok", 3), None);
        assert_eq!(prefix_key("_draft", 3), None);
        assert_eq!(prefix_key("draft_", 3).as_deref(), Some("draft"));
    }

    #[test]
    fn test_prefix_length_counts_characters() {
        assert_eq!(prefix_key("über", 3).as_deref(), Some("übe"));
        assert_eq!(prefix_key("äö", 3), None);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Tax  2024-Q1"), vec!["tax", "2024", "q1"]);
        assert_eq!(tokenize("single"), vec!["single"]);
    }
}
