//! Member entity - a user's membership in the guild

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild member entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub user_id: Snowflake,
    pub username: String,
    pub global_name: Option<String>,
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub bot: bool,
}

impl GuildMember {
    /// Create a new GuildMember with no roles
    pub fn new(user_id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            global_name: None,
            nickname: None,
            role_ids: Vec::new(),
            bot: false,
        }
    }

    /// Builder-style role assignment
    pub fn with_roles(mut self, role_ids: Vec<Snowflake>) -> Self {
        self.role_ids = role_ids;
        self
    }

    /// Get display name: guild nickname, then global name, then username
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .or(self.global_name.as_deref())
            .unwrap_or(&self.username)
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Add a role to the member
    pub fn add_role(&mut self, role_id: Snowflake) {
        if !self.has_role(role_id) {
            self.role_ids.push(role_id);
        }
    }

    /// Set the member's roles (replaces all existing roles)
    pub fn set_roles(&mut self, role_ids: Vec<Snowflake>) {
        self.role_ids = role_ids;
    }

    /// Case-folded username used for handle matching
    pub fn username_key(&self) -> String {
        self.username.to_lowercase()
    }
}
