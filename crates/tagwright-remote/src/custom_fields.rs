//! Read-only access to the remote's custom field definitions.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use tagwright_core::{defaults, Result};

use crate::client::PaperlessClient;

/// A custom field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub data_type: String,
}

impl CustomField {
    /// Human-readable name of the field's data type; unknown types are
    /// returned verbatim.
    pub fn type_name(&self) -> String {
        match self.data_type.as_str() {
            "string" => "Text",
            "url" => "URL",
            "date" => "Date",
            "boolean" => "Boolean",
            "integer" => "Integer",
            "float" => "Float",
            "monetary" => "Monetary",
            "documentlink" => "Document Link",
            "select" => "Select",
            other => other,
        }
        .to_string()
    }
}

impl PaperlessClient {
    /// Every custom field, in remote order.
    #[instrument(skip(self), fields(subsystem = "remote", component = "custom_fields", op = "list_custom_fields"))]
    pub async fn list_custom_fields(&self) -> Result<Vec<CustomField>> {
        self.get_all_pages(
            "/api/custom_fields/",
            &[("page_size", defaults::REMOTE_PAGE_SIZE)],
        )
        .await
    }
}
