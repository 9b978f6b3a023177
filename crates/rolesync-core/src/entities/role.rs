//! Role entity - a guild role as seen by the bot

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    pub position: i32,
    /// Roles owned by an integration (bots, boosts) cannot be assigned by hand
    #[serde(default)]
    pub managed: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            managed: false,
        }
    }

    /// Mark the role as integration-managed
    pub fn managed(mut self) -> Self {
        self.managed = true;
        self
    }

    /// Compare role positions for hierarchy (higher position = more authority)
    #[inline]
    pub fn is_higher_than(&self, other: &Role) -> bool {
        self.position > other.position
    }

    /// Check if this role sits at or above the given height in the hierarchy
    #[inline]
    pub fn is_at_or_above(&self, position: i32) -> bool {
        self.position >= position
    }
}
