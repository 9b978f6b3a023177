//! Membership record - one person's row in the membership database, decoded

use serde::{Deserialize, Serialize};

use crate::entities::page::DatabasePage;
use crate::error::DomainError;
use crate::value_objects::PageId;

/// Names of the database properties the engine reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Phone-number-typed property holding the member's chat handle
    pub discord_username: String,
    /// Select property holding the active status
    pub active: String,
    /// Multi-select property holding club positions
    pub club_positions: String,
    /// Relation property pointing at team pages
    pub teams: String,
    /// Title property of a team page
    pub team_name: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            discord_username: "Discord".to_string(),
            active: "Active".to_string(),
            club_positions: "Club Positions".to_string(),
            teams: "Teams".to_string(),
            team_name: "Name".to_string(),
        }
    }
}

/// A decoded membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub page_id: PageId,
    pub url: Option<String>,
    /// Raw chat handle, possibly blank or prefixed with `@`
    pub handle: Option<String>,
    /// Active-status option name; `None` when nothing is selected
    pub status: Option<String>,
    pub positions: Vec<String>,
    pub teams: Vec<PageId>,
}

impl MembershipRecord {
    /// Decode a page using the given schema.
    ///
    /// A missing property or one of the wrong kind is a hard fault.
    pub fn from_page(page: &DatabasePage, schema: &RecordSchema) -> Result<Self, DomainError> {
        let handle = page
            .property(&schema.discord_username)?
            .as_phone_number(&schema.discord_username)?
            .map(str::to_string);

        let status = page
            .property(&schema.active)?
            .as_select(&schema.active)?
            .map(str::to_string);

        let positions = page
            .property(&schema.club_positions)?
            .as_multi_select(&schema.club_positions)?
            .into_iter()
            .map(str::to_string)
            .collect();

        let teams = page
            .property(&schema.teams)?
            .as_relation(&schema.teams)?
            .iter()
            .map(|r| r.id.clone())
            .collect();

        Ok(Self {
            page_id: page.id.clone(),
            url: page.url.clone(),
            handle,
            status,
            positions,
            teams,
        })
    }

    /// Human-readable reference for log lines
    pub fn reference(&self) -> &str {
        self.url.as_deref().unwrap_or(self.page_id.as_str())
    }
}
