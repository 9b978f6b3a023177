//! Database page model
//!
//! Pages come out of the membership database with a schemaless property map.
//! Every property carries a `type` tag, so values decode into a tagged union
//! with one variant per kind the engine reads. Anything else lands in
//! [`PropertyValue::Other`] and is never inspected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::PageId;

/// One page (row) of a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabasePage {
    pub id: PageId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Select {
        #[serde(default)]
        id: String,
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        id: String,
        multi_select: Vec<SelectOption>,
    },
    Relation {
        #[serde(default)]
        id: String,
        relation: Vec<RelationRef>,
    },
    PhoneNumber {
        #[serde(default)]
        id: String,
        phone_number: Option<String>,
    },
    Title {
        #[serde(default)]
        id: String,
        title: Vec<RichText>,
    },
    #[serde(other)]
    Other,
}

/// An option of a select or multi-select property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// A reference from a relation property to another page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: PageId,
}

/// A rich text segment; only the plain text is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub plain_text: String,
}

/// A single property item returned by the property-item endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyItem {
    Title { title: RichText },
    #[serde(other)]
    Other,
}

/// One page of results from a database query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBatch {
    pub results: Vec<DatabasePage>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl PageBatch {
    /// Cursor for the next query, if the database reported more results
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

impl DatabasePage {
    /// Get a property by name, failing if the schema does not have it
    pub fn property(&self, name: &str) -> Result<&PropertyValue, DomainError> {
        self.properties
            .get(name)
            .ok_or_else(|| DomainError::MissingProperty(name.to_string()))
    }
}

impl PropertyValue {
    /// Tag name of this property kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::MultiSelect { .. } => "multi_select",
            Self::Relation { .. } => "relation",
            Self::PhoneNumber { .. } => "phone_number",
            Self::Title { .. } => "title",
            Self::Other => "other",
        }
    }

    /// Schema id of the property
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Select { id, .. }
            | Self::MultiSelect { id, .. }
            | Self::Relation { id, .. }
            | Self::PhoneNumber { id, .. }
            | Self::Title { id, .. } => Some(id.as_str()).filter(|id| !id.is_empty()),
            Self::Other => None,
        }
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> DomainError {
        DomainError::PropertyTypeMismatch {
            name: name.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// Selected option name of a select property
    pub fn as_select(&self, name: &str) -> Result<Option<&str>, DomainError> {
        match self {
            Self::Select { select, .. } => Ok(select.as_ref().map(|o| o.name.as_str())),
            other => Err(other.mismatch(name, "select")),
        }
    }

    /// Option names of a multi-select property
    pub fn as_multi_select(&self, name: &str) -> Result<Vec<&str>, DomainError> {
        match self {
            Self::MultiSelect { multi_select, .. } => {
                Ok(multi_select.iter().map(|o| o.name.as_str()).collect())
            }
            other => Err(other.mismatch(name, "multi_select")),
        }
    }

    /// Referenced page ids of a relation property
    pub fn as_relation(&self, name: &str) -> Result<&[RelationRef], DomainError> {
        match self {
            Self::Relation { relation, .. } => Ok(relation),
            other => Err(other.mismatch(name, "relation")),
        }
    }

    /// Raw value of a phone number property
    pub fn as_phone_number(&self, name: &str) -> Result<Option<&str>, DomainError> {
        match self {
            Self::PhoneNumber { phone_number, .. } => Ok(phone_number.as_deref()),
            other => Err(other.mismatch(name, "phone_number")),
        }
    }

    /// Plain text of a title property (all segments joined)
    pub fn as_title(&self, name: &str) -> Result<String, DomainError> {
        match self {
            Self::Title { title, .. } => Ok(title.iter().map(|t| t.plain_text.as_str()).collect()),
            other => Err(other.mismatch(name, "title")),
        }
    }
}
