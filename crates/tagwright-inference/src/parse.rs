//! Best-effort parsing of model output into groups.
//!
//! Models wrap JSON in reasoning blocks, code fences and prose, and
//! sometimes stop mid-object. Parsing peels those layers off and, when the
//! remaining JSON is still invalid, recovers every complete
//! `"name": [...]` entry it can find.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

const THINK_END: &str = "</think>";

/// Content of the first fenced block, with or without a language tag.
static FENCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").unwrap());

/// One JSON scalar: a string, a number or a literal.
const SCALAR: &str = r#"(?:"(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|true|false|null)"#;

/// A complete `"key": [ ... ]` entry whose array holds only scalars.
static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#""((?:[^"\\]|\\.)*)"\s*:\s*\[(\s*(?:{SCALAR}\s*(?:,\s*{SCALAR}\s*)*)?)\]"#
    ))
    .unwrap()
});

/// Parse raw model output into `group name -> member names`.
///
/// Never fails: output with no usable group yields an empty map.
pub fn parse_groups(content: &str) -> BTreeMap<String, Vec<String>> {
    let body = object_span(strip_fences(strip_thinking(content)));

    let groups = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => filter_groups(map),
        Ok(_) => BTreeMap::new(),
        Err(e) => {
            let recovered = recover_entries(body);
            debug!(
                subsystem = "inference",
                component = "parse",
                error = %e,
                recovered = recovered.len(),
                "Malformed JSON, recovered complete entries"
            );
            filter_groups(recovered)
        }
    };

    debug!(
        subsystem = "inference",
        component = "parse",
        response_len = content.len(),
        result_count = groups.len(),
        "Parsed group suggestions"
    );
    groups
}

/// Drop everything up to and including the last reasoning end marker.
fn strip_thinking(content: &str) -> &str {
    match content.rfind(THINK_END) {
        Some(pos) => &content[pos + THINK_END.len()..],
        None => content,
    }
}

fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(caps) = FENCED.captures(trimmed) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim();
        }
    }
    // An opening fence with no closing one: the response was cut off.
    if trimmed.starts_with("```") {
        return trimmed.split_once('\n').map_or("", |(_, rest)| rest).trim();
    }
    trimmed
}

/// The outermost `{...}` span. A missing closing brace keeps the tail so
/// truncated output can still be recovered.
fn object_span(content: &str) -> &str {
    let Some(start) = content.find('{') else {
        return content;
    };
    match content.rfind('}') {
        Some(end) if end > start => &content[start..=end],
        _ => &content[start..],
    }
}

fn recover_entries(content: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for caps in ENTRY.captures_iter(content) {
        let (Some(key), Some(items)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(key) = serde_json::from_str::<String>(&format!("\"{}\"", key.as_str())) else {
            continue;
        };
        if let Ok(items) = serde_json::from_str::<Value>(&format!("[{}]", items.as_str())) {
            map.insert(key, items);
        }
    }
    map
}

/// Keep list values, coerce members to strings, dedupe, and keep groups
/// with at least two members.
fn filter_groups(map: Map<String, Value>) -> BTreeMap<String, Vec<String>> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let Value::Array(items) = value else {
                return None;
            };
            let mut members: Vec<String> = Vec::new();
            for member in items.iter().filter_map(member_name) {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
            let key = key.trim().to_string();
            (members.len() >= 2 && !key.is_empty()).then_some((key, members))
        })
        .collect()
}

/// String form of an array member; empty and false-like values are skipped.
fn member_name(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(map: &BTreeMap<String, Vec<String>>, key: &str) -> Vec<String> {
        map.get(key).cloned().unwrap_or_default()
    }

    #[test]
    fn test_plain_json() {
        let groups = parse_groups(r#"{"Finance": ["invoice", "receipt"], "ID": ["passport", "visa"]}"#);
        assert_eq!(groups.len(), 2);
        assert_eq!(group(&groups, "Finance"), vec!["invoice", "receipt"]);
    }

    #[test]
    fn test_code_fence_with_language() {
        let content = "```json\n{\"Finance\": [\"invoice\", \"bill\"]}\n```";
        assert_eq!(group(&parse_groups(content), "Finance"), vec!["invoice", "bill"]);
    }

    #[test]
    fn test_code_fence_surrounded_by_prose() {
        let content = "Here you go:\n```\n{\"Finance\": [\"invoice\", \"bill\"]}\n```\nHope it helps.";
        assert_eq!(parse_groups(content).len(), 1);
    }

    #[test]
    fn test_thinking_stripped_through_last_marker() {
        let content = "<think>maybe {\"Wrong\": [\"a\", \"b\"]}</think><think>again</think>\n{\"Right\": [\"x\", \"y\"]}";
        let groups = parse_groups(content);
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key("Right"));
    }

    #[test]
    fn test_prose_around_object() {
        let content = "Sure! The groups are {\"Travel\": [\"flight\", \"hotel\"]} as requested.";
        assert_eq!(group(&parse_groups(content), "Travel"), vec!["flight", "hotel"]);
    }

    #[test]
    fn test_truncated_json_recovers_complete_entries() {
        let content = r#"{"Finance": ["invoice", "receipt"], "Travel": ["flight", "hot"#;
        let groups = parse_groups(content);
        assert_eq!(groups.len(), 1);
        assert_eq!(group(&groups, "Finance"), vec!["invoice", "receipt"]);
    }

    #[test]
    fn test_truncated_fence_recovers() {
        let content = "```json\n{\"Finance\": [\"invoice\", \"receipt\"], \"Tr";
        assert_eq!(parse_groups(content).len(), 1);
    }

    #[test]
    fn test_truncated_json_recovers_members_with_brackets() {
        let content = r#"{"Taxes": ["Tax [2023]", "Tax [2024]"], "Ids": [1, 2], "Travel": ["fli"#;
        let groups = parse_groups(content);
        assert_eq!(group(&groups, "Taxes"), vec!["Tax [2023]", "Tax [2024]"]);
        assert_eq!(group(&groups, "Ids"), vec!["1", "2"]);
        assert!(!groups.contains_key("Travel"));
    }

    #[test]
    fn test_recovered_keys_are_unescaped() {
        let content = r#"{"Say \"hi\"": ["hello", "hey"], broken"#;
        assert_eq!(group(&parse_groups(content), "Say \"hi\""), vec!["hello", "hey"]);
    }

    #[test]
    fn test_non_list_values_dropped() {
        let groups = parse_groups(r#"{"note": "nothing", "count": 3, "Pair": ["a", "b"]}"#);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Pair"]);
    }

    #[test]
    fn test_members_coerced_and_deduplicated() {
        let groups = parse_groups(r#"{"Years": [2023, "2023", 2024, null, "", false, 0]}"#);
        assert_eq!(group(&groups, "Years"), vec!["2023", "2024"]);
    }

    #[test]
    fn test_groups_with_fewer_than_two_members_dropped() {
        let groups = parse_groups(r#"{"Solo": ["a"], "Dup": ["b", "b"], "Ok": ["c", "d"]}"#);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Ok"]);
    }

    #[test]
    fn test_total_failure_is_empty() {
        assert!(parse_groups("I could not find any groups.").is_empty());
        assert!(parse_groups("").is_empty());
        assert!(parse_groups("[\"a\", \"b\"]").is_empty());
    }
}
