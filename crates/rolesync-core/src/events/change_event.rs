//! Change notification - the database's push payload for an updated record
//!
//! Automations post `{ "source": {...}, "data": <object> }`. Only payloads whose
//! `data` is a full page object are usable; anything else is a shape mismatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::DatabasePage;
use crate::error::DomainError;

/// Decoded change notification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ChangeEvent {
    /// Parse a notification from raw JSON
    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        Self::deserialize(value).map_err(|e| DomainError::InvalidPayload(e.to_string()))
    }

    /// Extract the changed page.
    ///
    /// Fails with [`DomainError::InvalidPayload`] when `data` is absent, is not
    /// a page object, or does not deserialize as a page.
    pub fn into_page(self) -> Result<DatabasePage, DomainError> {
        let data = self
            .data
            .ok_or_else(|| DomainError::InvalidPayload("missing data field".to_string()))?;

        match data.get("object").and_then(Value::as_str) {
            Some("page") => {}
            Some(other) => {
                return Err(DomainError::InvalidPayload(format!(
                    "expected a page object, got {other}"
                )))
            }
            None => {
                return Err(DomainError::InvalidPayload(
                    "data is not a database object".to_string(),
                ))
            }
        }

        DatabasePage::deserialize(&data).map_err(|e| DomainError::InvalidPayload(e.to_string()))
    }
}
