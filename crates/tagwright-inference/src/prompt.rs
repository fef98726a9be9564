//! Grouping prompt.

/// Prompt asking for semantic groups among `names`.
///
/// `item_type` is the plural human name of the items ("tags",
/// "correspondents", "document types"); `language` is the language group
/// names should be written in.
pub fn build_prompt(names: &[String], item_type: &str, language: &str) -> String {
    let items = names
        .iter()
        .map(|name| format!("- {}", name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are helping organize {item_type} in a document management system.

Given the following list of {item_type}, identify groups of items that are semantically related (same concept, synonyms, or closely related topics). Only include groups with 2 or more items.

{heading}:
{items}

Respond with a JSON object where keys are descriptive group names and values are arrays of the exact item names from the list above that belong to that group. Only include items that genuinely belong together semantically.

Write the group names in {language}. Item names must be copied exactly as listed, without translating them.

Example format:
{{"Financial Documents": ["invoice", "receipt", "bill"], "Personal ID": ["passport", "drivers-license"]}}

Respond ONLY with the JSON object, no other text."#,
        heading = item_type.to_uppercase(),
    )
}
