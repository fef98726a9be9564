//! Custom field listing.

use axum::{extract::State, Json};
use serde::Serialize;

use tagwright_remote::CustomField;

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct CustomFieldView {
    pub id: i64,
    pub name: String,
    pub data_type: String,
    pub type_name: String,
}

impl From<CustomField> for CustomFieldView {
    fn from(field: CustomField) -> Self {
        Self {
            type_name: field.type_name(),
            id: field.id,
            name: field.name,
            data_type: field.data_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomFieldsResponse {
    pub custom_fields: Vec<CustomFieldView>,
    pub total: usize,
}

/// List the remote's custom field definitions sorted by name.
///
/// # Returns
/// - 200 OK with `{custom_fields: [...], total}`
/// - 502 Bad Gateway if the remote call fails
pub async fn list_custom_fields(
    State(state): State<AppState>,
) -> Result<Json<CustomFieldsResponse>, ApiError> {
    let mut fields = state.paperless()?.list_custom_fields().await?;
    fields.sort_by_cached_key(|f| f.name.to_lowercase());

    let custom_fields: Vec<CustomFieldView> = fields.into_iter().map(Into::into).collect();
    Ok(Json(CustomFieldsResponse {
        total: custom_fields.len(),
        custom_fields,
    }))
}
