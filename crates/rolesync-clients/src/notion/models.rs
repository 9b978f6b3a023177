//! Wire models for the membership database API

use rolesync_core::PropertyItem;
use serde::{Deserialize, Serialize};

/// Body of a database query
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
    pub page_size: u32,
}

/// Response of the property-item endpoint.
///
/// Paginated kinds (title, rich text, relation) come back as a list object;
/// the rest come back as a single item.
#[derive(Debug, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum PropertyItemResponse {
    List { results: Vec<PropertyItem> },
    PropertyItem(PropertyItem),
}

impl PropertyItemResponse {
    pub fn into_items(self) -> Vec<PropertyItem> {
        match self {
            Self::List { results } => results,
            Self::PropertyItem(item) => vec![item],
        }
    }
}
