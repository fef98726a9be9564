//! HTTP handlers for tagwright-api.

pub mod custom_fields;
pub mod health;
pub mod metadata;

pub use custom_fields::list_custom_fields;
pub use health::{health_check, health_check_full};
pub use metadata::{
    delete_entities, list_all_entities, list_entities, llm_groups, low_usage, merge_entities,
    merge_preview, merge_suggestions, update_entity,
};
